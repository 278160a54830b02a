//! Declarations, calls and dialogs

use pretty_assertions::assert_eq;
use tagwalk::*;

fn run(markup: &str) -> Interpreter<RecordingHost> {
    run_with(markup, RecordingHost::new())
}

fn run_with(markup: &str, host: RecordingHost) -> Interpreter<RecordingHost> {
    let mut interp = Interpreter::from_markup(markup, host).expect("markup parses");
    interp.run();
    interp
}

fn var(interp: &Interpreter<RecordingHost>, name: &str) -> Option<Value> {
    interp.namespace().lookup_variable(name).cloned()
}

// ═══════════════════════════════════════════════════════════════════════
// Variables
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_number_variable_is_numeric() {
    let interp = run(r#"<variable name="x" value="3.5" type="number"></variable>"#);
    assert_eq!(var(&interp, "x"), Some(Value::Number(3.5)));
}

#[test]
fn test_array_variable_is_structured() {
    let interp = run(r#"<variable name="list" value="[1,2,3]" type="array"></variable>"#);
    let expected = Value::array(vec![
        Value::Number(1.0),
        Value::Number(2.0),
        Value::Number(3.0),
    ]);
    let stored = var(&interp, "list").unwrap();
    assert_eq!(stored, expected);

    // Resolving the bare name hands back the same sequence, not its text
    let resolved = interp.evaluate_value("list");
    assert!(resolved.strict_equals(&stored));
}

#[test]
fn test_boolean_and_string_variables() {
    let interp = run(
        r#"<variable name="on" value="true" type="boolean"></variable>
           <variable name="off" value="yes" type="boolean"></variable>
           <variable name="greeting" value="hi there"></variable>"#,
    );
    assert_eq!(var(&interp, "on"), Some(Value::Bool(true)));
    assert_eq!(var(&interp, "off"), Some(Value::Bool(false)));
    assert_eq!(var(&interp, "greeting"), Some(Value::string("hi there")));
}

#[test]
fn test_invalid_json_skips_only_that_variable() {
    let interp = run(
        r#"<variable name="bad" value="{oops" type="object"></variable>
           <variable name="good" value="1" type="number"></variable>"#,
    );
    assert_eq!(var(&interp, "bad"), None);
    assert_eq!(var(&interp, "good"), Some(Value::Number(1.0)));
}

#[test]
fn test_redeclaration_overwrites() {
    let interp = run(
        r#"<variable name="v" value="1" type="number"></variable>
           <variable name="v" value="two"></variable>"#,
    );
    assert_eq!(var(&interp, "v"), Some(Value::string("two")));
}

// ═══════════════════════════════════════════════════════════════════════
// Functions and Calls
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_function_body_does_not_run_at_declaration() {
    let interp = run(r#"<function name="f"><log message="body"></log></function>"#);
    assert!(interp.host().logs().is_empty());
    assert!(interp.namespace().contains_function("f"));
}

#[test]
fn test_second_function_declaration_wins() {
    let interp = run(
        r#"<function name="f"><log message="first"></log></function>
           <function name="f"><log message="second"></log></function>
           <call function="f"></call>"#,
    );
    assert_eq!(interp.host().logs(), vec!["second"]);
}

#[test]
fn test_call_to_undeclared_function_is_a_no_op() {
    let interp = run(r#"<call function="nothing"></call><log message="after"></log>"#);
    assert_eq!(interp.host().logs(), vec!["after"]);
}

#[test]
fn test_call_arguments_are_parsed_but_not_bound() {
    let interp = run(
        r#"<function name="f"><log message="ran"></log></function>
           <call function="f" args='1, "two", [3]'></call>
           <call function="f" args="1, oops"></call>"#,
    );
    // The second call has unparseable arguments and is skipped
    assert_eq!(interp.host().logs(), vec!["ran"]);
}

#[test]
fn test_recursion_is_bounded_by_call_depth() {
    let mut interp = Interpreter::from_markup(
        r#"<function name="r"><log message="in"></log><call function="r"></call></function>
           <call function="r"></call>
           <log message="still running"></log>"#,
        RecordingHost::new(),
    )
    .unwrap()
    .with_context(ExecContext::new().with_max_call_depth(4));
    interp.run();

    let logs = interp.host().logs();
    assert_eq!(logs.len(), 5);
    assert_eq!(logs.last(), Some(&"still running"));
}

#[test]
fn test_function_and_variable_may_share_a_name() {
    let interp = run(
        r#"<variable name="greet" value="hello"></variable>
           <function name="greet"><log message="greet"></log></function>
           <call function="greet"></call>"#,
    );
    assert_eq!(interp.host().logs(), vec!["hello"]);
}

#[test]
fn test_call_function_from_rust() {
    let mut interp = run(r#"<function name="f"><log message="x"></log></function>"#);
    assert_eq!(interp.call_function("f"), Ok(true));
    assert_eq!(interp.call_function("g"), Ok(false));
    assert_eq!(interp.host().logs(), vec!["x"]);
}

// ═══════════════════════════════════════════════════════════════════════
// Dialogs
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_confirm_and_prompt_store_answers() {
    let host = RecordingHost::new()
        .answer_confirm(true)
        .answer_prompt(Some("Ada"));
    let interp = run_with(
        r#"<confirm message="Sure?" variable="ok"></confirm>
           <prompt message="Name?" default="anon" variable="name"></prompt>
           <if condition="ok"><alert message="'Hi ' + name"></alert></if>"#,
        host,
    );
    assert_eq!(var(&interp, "ok"), Some(Value::Bool(true)));
    assert_eq!(var(&interp, "name"), Some(Value::string("Ada")));
    assert_eq!(interp.host().alerts(), vec!["Hi Ada"]);
    assert_eq!(
        interp.host().events[1],
        HostEvent::Prompt {
            message: "Name?".to_string(),
            default: "anon".to_string(),
        }
    );
}

#[test]
fn test_cancelled_prompt_stores_null() {
    let host = RecordingHost::new().answer_prompt(None);
    let interp = run_with(
        r#"<prompt message="Name?" variable="name"></prompt>"#,
        host,
    );
    assert_eq!(var(&interp, "name"), Some(Value::Null));
}

#[test]
fn test_message_falls_back_to_text_content() {
    let interp = run(
        r#"<variable name="who" value="world"></variable>
           <alert>Hello there</alert>
           <log message="">who</log>"#,
    );
    assert_eq!(interp.host().alerts(), vec!["Hello there"]);
    assert_eq!(interp.host().logs(), vec!["world"]);
}

#[test]
fn test_log_resolves_expressions() {
    let interp = run(
        r#"<variable name="a" value="2" type="number"></variable>
           <variable name="b" value="5" type="number"></variable>
           <log message="a * b + 1"></log>
           <log message="just words"></log>"#,
    );
    assert_eq!(interp.host().logs(), vec!["11", "just words"]);
}

#[test]
fn test_deeply_nested_message_is_logged_as_text() {
    let message = format!("{}1{} + 1", "(".repeat(10_000), ")".repeat(10_000));
    let interp = run(&format!(
        r#"<log message="{message}"></log>
           <if condition="{message}"><log message="never"></log></if>
           <log message="after"></log>"#
    ));
    assert_eq!(interp.host().logs(), vec![message.as_str(), "after"]);
}
