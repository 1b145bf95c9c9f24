use super::parse_feature;
use crate::gherkin::{ScenarioDefinition, StepKeyword};
use std::path::Path;

const LOGIN_FEATURE: &str = "\
@auth
Feature: Login
  As a user
  I want to log in

  Background:
    Given the server is running
    And a user exists

  # plain scenario
  Scenario: Login with valid password
    When the user logs in with \"secret\"
    Then the login succeeds
    And a session cookie is set

  Scenario Outline: Login as <user>
    When <user> logs in
    Then the response status is <status>
    \"\"\"
    Then this is doc string content
    \"\"\"

    Examples:
      | user  | status |
      | alice | 200    |
      | bob   | 401    |

    Examples: second table
      | user  | status |
      | carol | 403    |
";

#[test]
fn parses_plain_and_outline_scenarios() {
    let doc = parse_feature(Path::new("/repo/auth/login.feature"), LOGIN_FEATURE)
        .expect("parse feature");
    assert_eq!(doc.title, "Login");
    assert_eq!(doc.scenarios.len(), 2);

    let background = doc.background.expect("background");
    assert_eq!(background.line, 6);
    assert_eq!(background.steps.len(), 2);
    assert_eq!(background.steps[1].keyword, StepKeyword::And);

    let plain = &doc.scenarios[0];
    assert!(matches!(plain, ScenarioDefinition::Plain { line: 11, .. }));
    assert_eq!(plain.title(), "Login with valid password");
    let lines: Vec<usize> = plain.steps().iter().map(|step| step.line).collect();
    assert_eq!(lines, vec![12, 13, 14]);

    let ScenarioDefinition::Outline {
        line,
        title,
        steps,
        examples,
    } = &doc.scenarios[1]
    else {
        panic!("expected outline");
    };
    assert_eq!(*line, 16);
    assert_eq!(title, "Login as <user>");
    assert_eq!(steps.len(), 2, "doc string content is not a step");
    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].header, vec!["user", "status"]);
    assert_eq!(examples[0].rows.len(), 2);
    assert_eq!(examples[0].rows[0].cells, vec!["alice", "200"]);
    assert_eq!(examples[0].rows[0].line, 25);
    assert_eq!(examples[1].rows[0].cells, vec!["carol", "403"]);
    assert_eq!(examples[1].rows[0].line, 30);
}

#[test]
fn skips_step_data_tables() {
    let text = "\
Feature: Tables
  Scenario: create users
    Given these users exist:
      | name  |
      | alice |
    Then there are 1 users
";
    let doc = parse_feature(Path::new("a/tables.feature"), text).expect("parse");
    assert_eq!(doc.scenarios[0].steps().len(), 2);
}

#[test]
fn splits_escaped_pipes_in_cells() {
    let text = "\
Feature: Escapes
  Scenario Outline: value <v>
    Given <v>
    Examples:
      | v          |
      | a \\| b    |
";
    let doc = parse_feature(Path::new("a/escape.feature"), text).expect("parse");
    let ScenarioDefinition::Outline { examples, .. } = &doc.scenarios[0] else {
        panic!("expected outline");
    };
    assert_eq!(examples[0].rows[0].cells, vec!["a | b"]);
}

#[test]
fn rejects_background_after_scenario() {
    let text = "\
Feature: Order
  Scenario: first
    Given something
  Background:
    Given setup
";
    let err = parse_feature(Path::new("a/order.feature"), text).expect_err("misplaced background");
    let message = err.to_string();
    assert!(message.contains("a/order.feature:4"), "{message}");
    assert!(message.contains("Background"), "{message}");
}

#[test]
fn rejects_step_outside_scenario() {
    let text = "\
Feature: Loose
  Given a step without a scenario
";
    let err = parse_feature(Path::new("loose.feature"), text).expect_err("loose step");
    assert!(err.to_string().contains("step outside"));
}

#[test]
fn rejects_examples_under_plain_scenario() {
    let text = "\
Feature: Examples
  Scenario: plain
    Given a step
    Examples:
      | a |
";
    let err = parse_feature(Path::new("x.feature"), text).expect_err("examples under plain");
    assert!(err.to_string().contains("outside of a Scenario Outline"));
}

#[test]
fn rejects_mismatched_examples_row() {
    let text = "\
Feature: Rows
  Scenario Outline: rows
    Given <a>
    Examples:
      | a | b |
      | 1 |
";
    let err = parse_feature(Path::new("rows.feature"), text).expect_err("short row");
    assert!(err.to_string().contains("rows.feature:6"));
}

#[test]
fn rejects_unterminated_doc_string() {
    let text = "\
Feature: Docs
  Scenario: docs
    Given the text
      \"\"\"
      never closed
";
    let err = parse_feature(Path::new("docs.feature"), text).expect_err("open doc string");
    assert!(err.to_string().contains("docs.feature:4"));
}

#[test]
fn rejects_free_text_between_steps() {
    let text = "\
Feature: Text
  Scenario: text
    Given a step
    this line is not a step
";
    let err = parse_feature(Path::new("text.feature"), text).expect_err("free text");
    assert!(err.to_string().contains("unexpected text"));
}

#[test]
fn empty_document_has_no_scenarios() {
    let doc = parse_feature(Path::new("empty.feature"), "# just a comment\n\n").expect("parse");
    assert!(doc.title.is_empty());
    assert!(doc.scenarios.is_empty());
}

#[test]
fn star_and_but_are_continuation_steps() {
    let text = "\
Feature: Keywords
  Scenario: keywords
    Given one
    * two
    But three
";
    let doc = parse_feature(Path::new("k.feature"), text).expect("parse");
    let keywords: Vec<StepKeyword> = doc.scenarios[0]
        .steps()
        .iter()
        .map(|step| step.keyword)
        .collect();
    assert_eq!(
        keywords,
        vec![StepKeyword::Given, StepKeyword::Star, StepKeyword::But]
    );
    assert!(!StepKeyword::Star.is_leading());
    assert!(!StepKeyword::But.is_leading());
}
