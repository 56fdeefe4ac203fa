use std::{fs, path::PathBuf, sync::Arc};

use serde_json::{Value, json};
use template_issues::{
    FilterConfig, FilterStatus, Position, ReportKind, Row, StepIndex, TemplateFilter,
    batch::{filter_submission_row, read_rows, template_issue_rows},
    filter_submissions,
};
use uuid::Uuid;

const TEMPLATE: &str = "def main():\n    # your code here\n    return total\n";
const CODE: &str = "def main():\n    total = 0\n    return total\n";

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("template-issues-batch-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn row(value: Value) -> Row {
    value.as_object().cloned().expect("row is an object")
}

fn hyperstyle_issues() -> String {
    json!({
        "quality": {"code": "GOOD", "text": "GOOD"},
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
    .to_string()
}

fn steps() -> Vec<Row> {
    vec![
        row(json!({"id": 10, "code_template": TEMPLATE})),
        row(json!({
            "id": 11,
            "code_template": "",
            "code_templates": json!({"python3": TEMPLATE}).to_string(),
        })),
    ]
}

fn submission(id: u64, step_id: Value, lang: &str) -> Row {
    row(json!({
        "id": id,
        "step_id": step_id,
        "lang": lang,
        "code": CODE,
        "hyperstyle_issues": hyperstyle_issues(),
        "user": "someone",
    }))
}

fn issue_codes(column: &Value) -> Vec<String> {
    let report: Value = serde_json::from_str(column.as_str().expect("string column")).expect("json");
    report["issues"]
        .as_array()
        .expect("issues")
        .iter()
        .map(|issue| issue["code"].as_str().expect("code").to_string())
        .collect()
}

#[test]
fn classified_row_gets_every_column() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let index = StepIndex::new(&steps());
    let mut submission = submission(1, json!(10), "python3");

    let status = filter_submission_row(&filter, &index, ReportKind::Hyperstyle, &mut submission);

    assert_eq!(status, FilterStatus::Classified);
    assert_eq!(submission["template_filter_status"], "classified");
    assert_eq!(issue_codes(&submission["hyperstyle_issues"]), vec!["W0612"]);
    assert_eq!(issue_codes(&submission["hyperstyle_issues_diff"]), vec!["E0602"]);
    assert_eq!(
        issue_codes(&submission["hyperstyle_issues_all"]),
        vec!["E0602", "W0612"]
    );
    assert_eq!(submission["hyperstyle_issues_diff_template_positions"], json!([[3, 11]]));
    assert_eq!(submission["user"], "someone");
    assert!(submission.get("template_filter_error").is_none());
}

#[test]
fn per_language_templates_are_used() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let index = StepIndex::new(&steps());
    let mut submission = submission(2, json!("11"), "python3");

    let status = filter_submission_row(&filter, &index, ReportKind::Hyperstyle, &mut submission);

    assert_eq!(status, FilterStatus::Classified);
    assert_eq!(issue_codes(&submission["hyperstyle_issues_diff"]), vec!["E0602"]);
}

#[test]
fn failures_leave_issues_unfiltered() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let index = StepIndex::new(&steps());

    let mut missing_template = submission(3, json!(11), "java11");
    let status =
        filter_submission_row(&filter, &index, ReportKind::Hyperstyle, &mut missing_template);
    assert_eq!(status, FilterStatus::Unclassified);
    assert_eq!(missing_template["template_filter_status"], "unclassified");
    assert!(
        missing_template["template_filter_error"]
            .as_str()
            .expect("error text")
            .contains("java11")
    );
    assert_eq!(
        issue_codes(&missing_template["hyperstyle_issues"]),
        vec!["E0602", "W0612"]
    );
    assert_eq!(
        missing_template["hyperstyle_issues_diff_template_positions"],
        json!([])
    );

    let mut unknown_step = submission(4, json!(99), "python3");
    let status = filter_submission_row(&filter, &index, ReportKind::Hyperstyle, &mut unknown_step);
    assert_eq!(status, FilterStatus::Unclassified);
    assert!(
        unknown_step["template_filter_error"]
            .as_str()
            .expect("error text")
            .contains("99")
    );

    let mut wrong_column = submission(5, json!(10), "python3");
    let status = filter_submission_row(&filter, &index, ReportKind::Qodana, &mut wrong_column);
    assert_eq!(status, FilterStatus::Unclassified);
}

#[tokio::test]
async fn batch_keeps_order_and_isolates_failures() {
    let rows: Vec<Row> = (0..20)
        .map(|id| {
            if id % 5 == 0 {
                submission(id, json!(99), "python3")
            } else {
                submission(id, json!(10 + id % 2), "python3")
            }
        })
        .collect();
    let filter = Arc::new(TemplateFilter::new(
        FilterConfig::builder().workers(3usize).build(),
    ));

    let filtered = filter_submissions(
        rows,
        Arc::new(StepIndex::new(&steps())),
        ReportKind::Hyperstyle,
        filter,
    )
    .await
    .expect("batch");

    assert_eq!(filtered.len(), 20);
    for (id, row) in filtered.iter().enumerate() {
        assert_eq!(row["id"], json!(id));
        let expected = if id % 5 == 0 {
            FilterStatus::Unclassified
        } else {
            FilterStatus::Classified
        };
        assert_eq!(FilterStatus::of(row), Some(expected), "row {id}");
    }

    let template_issues =
        template_issue_rows(&filtered, ReportKind::Hyperstyle).expect("template issues");
    // Every classified submission reports the same template issue per step.
    assert_eq!(template_issues.len(), 2);
    assert_eq!(template_issues[0].step_id(), "10");
    assert_eq!(template_issues[1].step_id(), "11");
    assert!(template_issues.iter().all(|issue| issue.name() == "E0602"));
    assert_eq!(template_issues[0].position(), Position::new(3, 11));
}

#[tokio::test]
async fn rows_load_from_files() {
    let root = temp_root();
    let lines = root.join("submissions.jsonl");
    let array = root.join("steps.json");
    fs::write(
        &lines,
        format!(
            "{}\n{}\n",
            Value::Object(submission(1, json!(10), "python3")),
            Value::Object(submission(2, json!(11), "python3"))
        ),
    )
    .expect("write submissions");
    fs::write(&array, Value::Array(steps().into_iter().map(Value::Object).collect()).to_string())
        .expect("write steps");

    let submissions = read_rows(&tokio::fs::read_to_string(&lines).await.expect("read"))
        .expect("parse submissions");
    let steps = read_rows(&tokio::fs::read_to_string(&array).await.expect("read"))
        .expect("parse steps");

    assert_eq!(submissions.len(), 2);
    assert_eq!(steps.len(), 2);
    assert_eq!(StepIndex::new(&steps).len(), 2);

    let _ = fs::remove_dir_all(root);
}
