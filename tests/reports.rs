use serde_json::{Value, json};
use template_issues::{
    FilterConfig, FilterError, Position, ReportKind, TemplateFilter,
    issue::{HyperstyleReport, Issue, IssueReport, QodanaReport},
};

const TEMPLATE: &str = "def main():\n    # your code here\n    return total\n";
const CODE: &str = "def main():\n    total = 0\n    return total\n";

fn hyperstyle_json() -> Value {
    json!({
        "quality": {"code": "GOOD", "text": "Code quality (beta): GOOD"},
        "issues": [
            {
                "code": "E0602",
                "text": "Undefined variable 'total'",
                "line": "return total",
                "line_number": 3,
                "column_number": 11,
                "category": "ERROR_PRONE",
                "difficulty": "HARD",
                "influence_on_penalty": 0
            },
            {
                "code": "W0612",
                "text": "Unused variable 'total'",
                "line": "total = 0",
                "line_number": 2,
                "column_number": 4,
                "category": "BEST_PRACTICES",
                "difficulty": "MEDIUM",
                "influence_on_penalty": 0
            }
        ]
    })
}

fn qodana_problem(name: &str, line: usize, offset: usize) -> Value {
    json!({
        "tool": "Code Inspection",
        "category": "Probable bugs",
        "type": "problem",
        "severity": "High",
        "comment": format!("{name} found"),
        "detailsInfo": "",
        "sources": [{
            "type": "file",
            "path": "solution.py",
            "language": "Python",
            "line": line,
            "offset": offset,
            "length": 5,
            "code": {
                "startLine": line,
                "length": 5,
                "offset": 0,
                "surroundingCode": ""
            }
        }],
        "attributes": {"inspectionName": name}
    })
}

#[test]
fn hyperstyle_report_splits_by_origin() {
    let report = HyperstyleReport::from_json(&hyperstyle_json().to_string()).expect("parse");
    let filter = TemplateFilter::new(FilterConfig::default());

    let filtered = filter.filter_report(TEMPLATE, CODE, &report).expect("filter");

    assert_eq!(filtered.all_issues, report);
    assert_eq!(filtered.new_issues.issues.len(), 1);
    assert_eq!(filtered.new_issues.issues[0].code, "W0612");
    assert_eq!(filtered.template_issues.issues.len(), 1);
    assert_eq!(filtered.template_issues.issues[0].code, "E0602");
    assert_eq!(filtered.template_positions, vec![Position::new(3, 11)]);
    assert_eq!(filtered.new_issues.quality, report.quality);
}

#[test]
fn hyperstyle_report_survives_serialization() {
    let report = HyperstyleReport::from_json(&hyperstyle_json().to_string()).expect("parse");
    let json: Value = serde_json::from_str(&report.to_json().expect("serialize")).expect("json");
    assert_eq!(json, hyperstyle_json());
}

#[test]
fn qodana_problems_expose_first_source() {
    let report: QodanaReport = serde_json::from_value(json!({
        "version": "3",
        "listProblem": [
            qodana_problem("PyUnresolvedReferences", 3, 11),
            {
                "tool": "Code Inspection",
                "category": "General",
                "type": "problem",
                "severity": "Low",
                "comment": "Project-wide problem",
                "detailsInfo": "",
                "sources": [],
                "attributes": {"inspectionName": "ProjectWide"}
            }
        ]
    }))
    .expect("parse");

    let first = &report.issues()[0];
    assert_eq!(first.name(), "PyUnresolvedReferences");
    assert_eq!(first.text(), "PyUnresolvedReferences found");
    assert_eq!((first.line(), first.column()), (3, 11));
    assert_eq!(first.difficulty(), "High");

    let global = &report.issues()[1];
    assert_eq!((global.line(), global.column()), (0, 0));
}

#[test]
fn qodana_report_splits_by_origin() {
    let report: QodanaReport = serde_json::from_value(json!({
        "version": "3",
        "listProblem": [
            qodana_problem("PyUnusedLocal", 2, 4),
            qodana_problem("PyUnresolvedReferences", 3, 11),
        ]
    }))
    .expect("parse");
    let filter = TemplateFilter::new(FilterConfig::default());

    let filtered = filter.filter_report(TEMPLATE, CODE, &report).expect("filter");

    let names = |report: &QodanaReport| {
        report
            .issues()
            .iter()
            .map(|issue| issue.name().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&filtered.new_issues), vec!["PyUnusedLocal"]);
    assert_eq!(names(&filtered.template_issues), vec!["PyUnresolvedReferences"]);
    assert_eq!(filtered.new_issues.version, "3");

    let json: Value = serde_json::from_str(&filtered.template_issues.to_json().expect("json"))
        .expect("valid json");
    assert!(json.get("listProblem").is_some());
}

#[test]
fn malformed_reports_are_errors() {
    let err = HyperstyleReport::from_json("{\"issues\": 3}").expect_err("not a report");
    assert!(matches!(err, FilterError::MalformedReport(_)));
}

#[test]
fn report_kinds_parse_from_column_names() {
    assert_eq!(
        "hyperstyle_issues".parse::<ReportKind>(),
        Ok(ReportKind::Hyperstyle)
    );
    assert_eq!("qodana".parse::<ReportKind>(), Ok(ReportKind::Qodana));
    assert!("pylint_issues".parse::<ReportKind>().is_err());
    assert_eq!(ReportKind::Qodana.column(), "qodana_issues");
}
