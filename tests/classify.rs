use template_issues::{
    CleanupMode, DiffTag, FilterConfig, Position, TemplateFilter,
    diff::{OffsetMapper, code_text, template_text},
    filter::{
        ClassifiedIssue, classify_sorted, locate_issues, partition_issues, sort_by_offset,
        template_position,
    },
    issue::{HyperstyleIssue, Issue},
    util::split_lines,
};

fn issue(code: &str, line: usize, column: usize) -> HyperstyleIssue {
    HyperstyleIssue {
        code:                 code.to_string(),
        text:                 format!("{code} at {line}:{column}"),
        line:                 String::new(),
        line_number:          line,
        column_number:        column,
        category:             "CODE_STYLE".to_string(),
        difficulty:           "EASY".to_string(),
        influence_on_penalty: 0,
    }
}

fn summary(items: &[ClassifiedIssue<'_, HyperstyleIssue>]) -> Vec<(usize, bool, Option<usize>)> {
    items
        .iter()
        .map(|item| (item.index, item.is_template_issue, item.template_offset))
        .collect()
}

fn names<I: Issue>(issues: &[&I]) -> Vec<String> {
    issues.iter().map(|issue| issue.name().to_string()).collect()
}

#[test]
fn unchanged_template_keeps_issue_in_template() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("E1", 1, 0)];

    let partition = filter
        .partition("x = 1\n", "x = 1\n", &issues)
        .expect("partition");

    assert!(partition.new_issues.is_empty());
    assert_eq!(names(&partition.template_issues), vec!["E1"]);
    assert_eq!(partition.template_positions, vec![Position::new(1, 0)]);
}

#[test]
fn issue_in_replaced_text_is_new() {
    let filter = TemplateFilter::new(FilterConfig::default());
    // `42` replaced the placeholder comment.
    let issues = vec![issue("MAGIC", 1, 4), issue("MAGIC2", 1, 5)];

    let partition = filter
        .partition("x = # TODO\n", "x = 42\n", &issues)
        .expect("partition");

    assert_eq!(names(&partition.new_issues), vec!["MAGIC", "MAGIC2"]);
    assert!(partition.template_issues.is_empty());
    assert!(partition.template_positions.is_empty());
}

#[test]
fn issue_without_position_uses_first_segment() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("FILE_LEVEL", 0, 0)];

    let partition = filter
        .partition("x = # TODO\n", "x = 42\n", &issues)
        .expect("partition");

    assert_eq!(names(&partition.template_issues), vec!["FILE_LEVEL"]);
    assert_eq!(partition.template_positions, vec![Position::new(1, 0)]);
}

#[test]
fn issue_without_position_in_rewritten_code_is_new() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("FILE_LEVEL", 0, 0)];

    let partition = filter
        .partition("pass\n", "x = 1\n", &issues)
        .expect("partition");

    assert_eq!(names(&partition.new_issues), vec!["FILE_LEVEL"]);
}

#[test]
fn replaced_placeholder_comment_splits_issues() {
    let template = "def main():\n    # your code here\n    return total\n";
    let code = "def main():\n    total = 0\n    return total\n";
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("UNDEFINED", 3, 11), issue("STYLE", 2, 4)];

    let partition = filter.partition(template, code, &issues).expect("partition");

    assert_eq!(names(&partition.new_issues), vec!["STYLE"]);
    assert_eq!(names(&partition.template_issues), vec!["UNDEFINED"]);
    assert_eq!(partition.template_positions, vec![Position::new(3, 11)]);
    assert_eq!(partition.template_mask, vec![true, false]);
}

#[test]
fn segments_cover_both_documents() {
    let template = "def main():\n    # your code here\n    return total\n";
    let code = "def main():\n    total = 0\n    return total\n";

    for cleanup in [CleanupMode::Never, CleanupMode::Always, CleanupMode::Auto] {
        let filter = TemplateFilter::new(FilterConfig::default().with_cleanup(cleanup));
        let segments = filter.segments(template, code);

        assert_eq!(template_text(&segments), template);
        assert_eq!(code_text(&segments), code);

        let last = segments.last().expect("non-empty");
        assert_eq!(last.template_interval.end, template.chars().count());
        assert_eq!(last.code_interval.end, code.chars().count());

        for pair in segments.windows(2) {
            assert_eq!(pair[0].template_interval.end, pair[1].template_interval.start);
            assert_eq!(pair[0].code_interval.end, pair[1].code_interval.start);
        }
        for segment in &segments {
            match segment.tag {
                DiffTag::Insert => assert!(segment.template_interval.is_empty()),
                DiffTag::Delete => assert!(segment.code_interval.is_empty()),
                DiffTag::Equal => {
                    assert_eq!(segment.template_interval.len(), segment.code_interval.len())
                }
            }
        }
    }
}

#[test]
fn pipeline_sorts_issues_itself() {
    let filter = TemplateFilter::new(FilterConfig::default());
    // Reported in reverse order; both sit in unchanged text.
    let issues = vec![issue("LATE", 1, 5), issue("EARLY", 1, 2)];

    let partition = filter
        .partition("abcXefgh\n", "abcYefgh\n", &issues)
        .expect("partition");

    assert!(partition.new_issues.is_empty());
    assert_eq!(names(&partition.template_issues), vec!["LATE", "EARLY"]);
    assert_eq!(
        partition.template_positions,
        vec![Position::new(1, 5), Position::new(1, 2)]
    );
}

#[test]
fn unsorted_input_defeats_the_forward_scan() {
    let template = "abcXefgh";
    let code = "abcYefgh";
    let filter = TemplateFilter::new(FilterConfig::default());
    let segments = filter.segments(template, code);
    let mapper = OffsetMapper::new(&split_lines(code));
    let issues = vec![issue("AT_5", 1, 5), issue("AT_2", 1, 2)];

    let unsorted = locate_issues(&issues, &mapper, false).expect("locate");
    let mut sorted = unsorted.clone();
    sort_by_offset(&mut sorted);
    assert_eq!(
        unsorted.iter().map(|item| item.offset).collect::<Vec<_>>(),
        vec![5, 2]
    );

    let from_sorted = classify_sorted(&sorted, &segments);
    assert!(from_sorted.iter().all(|item| item.is_template_issue));

    // Offset 5 moves the cursor past the segment that covers offset 2.
    let from_unsorted = classify_sorted(&unsorted, &segments);
    assert!(from_unsorted[0].is_template_issue);
    assert_eq!(from_unsorted[0].template_offset, Some(5));
    assert!(!from_unsorted[1].is_template_issue);
    assert_eq!(from_unsorted[1].template_offset, None);
}

#[test]
fn classification_is_idempotent() {
    let template = "def main():\n    # your code here\n    return total\n";
    let code = "def main():\n    total = 0\n    return total\n";
    let filter = TemplateFilter::new(FilterConfig::default());
    let segments = filter.segments(template, code);
    let mapper = OffsetMapper::new(&split_lines(code));
    let issues = vec![issue("A", 1, 0), issue("B", 2, 6), issue("C", 3, 4)];

    let mut located = locate_issues(&issues, &mapper, false).expect("locate");
    sort_by_offset(&mut located);

    let first = classify_sorted(&located, &segments);
    let second = classify_sorted(&located, &segments);
    assert_eq!(summary(&first), summary(&second));
}

#[test]
fn partitions_share_the_callers_issues() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("A", 1, 0), issue("B", 1, 4)];

    let partition = filter
        .partition("x = # TODO\n", "x = 42\n", &issues)
        .expect("partition");

    assert_eq!(partition.all_issues.len(), issues.len());
    for (kept, original) in partition.all_issues.iter().zip(&issues) {
        assert!(std::ptr::eq(*kept, original));
    }
    assert!(std::ptr::eq(partition.template_issues[0], &issues[0]));
    assert!(std::ptr::eq(partition.new_issues[0], &issues[1]));
}

#[test]
fn strict_positions_reject_issues_outside_the_code() {
    let filter = TemplateFilter::new(FilterConfig::default().with_strict_positions(true));
    let issues = vec![issue("FAR", 7, 0)];

    assert!(filter.partition("x = 1\n", "x = 1\n", &issues).is_err());

    let lenient = TemplateFilter::new(FilterConfig::default());
    assert!(lenient.partition("x = 1\n", "x = 1\n", &issues).is_ok());
}

#[test]
fn issue_at_end_of_code_matches_the_last_equality() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("EOF", 1, 5)];

    let partition = filter.partition("x = 1", "x = 1", &issues).expect("partition");

    assert_eq!(partition.template_mask, vec![true]);
    // Stays on the template's only line instead of a line past its end.
    assert_eq!(partition.template_positions, vec![Position::new(1, 5)]);
    let template = OffsetMapper::new(&split_lines("x = 1"));
    assert_eq!(
        template
            .checked_position_to_offset(1, 5)
            .expect("end of the last line"),
        5
    );
}

#[test]
fn end_of_terminated_template_maps_to_its_last_line() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("EOF", 2, 0)];

    let partition = filter
        .partition("x = 1\n", "x = 1\n", &issues)
        .expect("partition");

    assert_eq!(partition.template_positions, vec![Position::new(1, 6)]);
    let template = OffsetMapper::new(&split_lines("x = 1\n"));
    assert_eq!(template.checked_position_to_offset(1, 6).expect("line end"), 6);
    assert_eq!(template_position(&template, 2), Position::new(1, 2));
}

#[test]
fn issue_at_end_of_inserted_code_is_new() {
    let filter = TemplateFilter::new(FilterConfig::default());
    let issues = vec![issue("EOF", 2, 5)];

    let partition = filter
        .partition("x = 1\n", "x = 1\ny = 2", &issues)
        .expect("partition");

    assert_eq!(partition.template_mask, vec![false]);
    assert!(partition.template_positions.is_empty());
}

#[test]
fn partition_skips_unknown_indices() {
    let issues = vec![issue("A", 1, 0)];
    let template = OffsetMapper::new(&split_lines("x = 1\n"));
    let classified = vec![
        ClassifiedIssue {
            index:             3,
            issue:             &issues[0],
            is_template_issue: false,
            template_offset:   None,
        },
        ClassifiedIssue {
            index:             0,
            issue:             &issues[0],
            is_template_issue: true,
            template_offset:   Some(0),
        },
    ];

    let partition = partition_issues(&classified, issues.len(), &template);

    assert_eq!(partition.all_issues.len(), 1);
    assert_eq!(partition.template_mask, vec![true]);
    assert_eq!(partition.template_positions, vec![Position::new(1, 0)]);
}
