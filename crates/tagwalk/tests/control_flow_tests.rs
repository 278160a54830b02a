//! Tests for `if`, `for` and `while`

use pretty_assertions::assert_eq;
use tagwalk::*;

fn run(markup: &str) -> Interpreter<RecordingHost> {
    run_in(markup, ExecContext::default())
}

fn run_in(markup: &str, ctx: ExecContext) -> Interpreter<RecordingHost> {
    let mut interp = Interpreter::from_markup(markup, RecordingHost::new())
        .expect("markup parses")
        .with_context(ctx);
    interp.run();
    interp
}

// ═══════════════════════════════════════════════════════════════════════
// If
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_if_runs_children_once_when_true() {
    let interp = run(
        r#"<variable name="n" value="5" type="number"></variable>
           <if condition="n > 3"><log message="big"></log><log message="really"></log></if>
           <if condition="n > 10"><log message="huge"></log></if>"#,
    );
    assert_eq!(interp.host().logs(), vec!["big", "really"]);
}

#[test]
fn test_if_with_broken_condition_is_skipped() {
    let interp = run(
        r#"<if condition="nope &&& 1"><log message="never"></log></if>
           <if><log message="no condition"></log></if>
           <log message="after"></log>"#,
    );
    assert_eq!(interp.host().logs(), vec!["after"]);
}

#[test]
fn test_condition_failure_does_not_raise() {
    let ns = Namespace::new();
    assert!(!evaluate_condition("undeclared == 1", &ns));
    assert!(!evaluate_condition("(1 + ", &ns));
}

#[test]
fn test_string_variable_in_condition_is_not_resubstituted() {
    let interp = run(
        r#"<variable name="mode" value="edit"></variable>
           <variable name="edit" value="0" type="number"></variable>
           <if condition="mode == 'edit'"><log message="editing"></log></if>"#,
    );
    assert_eq!(interp.host().logs(), vec!["editing"]);
}

// ═══════════════════════════════════════════════════════════════════════
// For
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_for_runs_children_three_times() {
    let interp = run(
        r#"<for init="i=0" condition="i<3" increment="i=i+1">
               <log message="i"></log>
           </for>"#,
    );
    assert_eq!(interp.host().logs(), vec!["0", "1", "2"]);
    assert_eq!(
        interp.namespace().lookup_variable("i"),
        Some(&Value::Number(3.0))
    );
}

#[test]
fn test_for_with_compound_statements() {
    let interp = run(
        r#"<for init="let i = 10; total = 0" condition="i > 0" increment="total += i; i -= 4">
           </for>"#,
    );
    // i: 10, 6, 2
    assert_eq!(
        interp.namespace().lookup_variable("total"),
        Some(&Value::Number(18.0))
    );
}

#[test]
fn test_for_with_failing_init_does_not_loop() {
    let interp = run(
        r#"<for init="i = missing" condition="i < 3" increment="i++">
               <log message="body"></log>
           </for>
           <log message="after"></log>"#,
    );
    assert_eq!(interp.host().logs(), vec!["after"]);
}

#[test]
fn test_nested_for_loops() {
    let interp = run(
        r#"<for init="i = 0" condition="i < 2" increment="i++">
               <for init="j = 0" condition="j < 2" increment="j++">
                   <log message="i + '-' + j"></log>
               </for>
           </for>"#,
    );
    assert_eq!(interp.host().logs(), vec!["0-0", "0-1", "1-0", "1-1"]);
}

// ═══════════════════════════════════════════════════════════════════════
// While and Loop Limits
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_while_stops_when_condition_turns_false() {
    // The inner for bumps k through its init statement and never loops
    let interp = run(
        r#"<variable name="k" value="0" type="number"></variable>
           <while condition="k < 3">
               <log message="k"></log>
               <for init="k = k + 1" condition="false"></for>
           </while>"#,
    );
    assert_eq!(interp.host().logs(), vec!["0", "1", "2"]);
}

#[test]
fn test_always_true_while_hits_the_budget() {
    let interp = run_in(
        r#"<while condition="true"><log message="tick"></log></while>
           <log message="after"></log>"#,
        ExecContext::new().with_max_loop_iterations(5),
    );
    let logs = interp.host().logs();
    assert_eq!(logs.len(), 6);
    assert_eq!(logs[5], "after");
}

#[test]
fn test_budget_applies_per_loop() {
    let interp = run_in(
        r#"<for init="i = 0" condition="i < 3" increment="i++"><log message="a"></log></for>
           <for init="i = 0" condition="i < 3" increment="i++"><log message="b"></log></for>"#,
        ExecContext::new().with_max_loop_iterations(3),
    );
    assert_eq!(interp.host().logs().len(), 6);
}

#[test]
fn test_interrupt_stops_the_run() {
    let ctx = ExecContext::new();
    ctx.interrupt();
    let interp = run_in(r#"<log message="never"></log>"#, ctx);
    assert!(interp.host().logs().is_empty());
}
