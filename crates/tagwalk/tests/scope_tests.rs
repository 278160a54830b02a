//! Scope-opening directives and the actions that use their target

use pretty_assertions::assert_eq;
use tagwalk::*;

fn run(markup: &str) -> Interpreter<RecordingHost> {
    let mut interp = Interpreter::from_markup(markup, RecordingHost::new()).expect("markup parses");
    interp.run();
    interp
}

fn by_id(interp: &Interpreter<RecordingHost>, id: &str) -> NodeId {
    interp
        .document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element #{id}"))
}

// ═══════════════════════════════════════════════════════════════════════
// Scope Openers
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_query_selector_all_runs_body_per_match() {
    let interp = run(
        r#"<p id="one" class="t">a</p>
           <p id="two" class="t">b</p>
           <p id="three">c</p>
           <querySelectorAll selector=".t">
               <set data-seen="yes"></set>
               <log message="hit"></log>
           </querySelectorAll>"#,
    );
    let doc = interp.document();
    assert_eq!(doc.attribute(by_id(&interp, "one"), "data-seen"), Some("yes"));
    assert_eq!(doc.attribute(by_id(&interp, "two"), "data-seen"), Some("yes"));
    assert_eq!(doc.attribute(by_id(&interp, "three"), "data-seen"), None);
    assert_eq!(interp.host().logs(), vec!["hit", "hit"]);
}

#[test]
fn test_get_element_by_id_and_query_selector() {
    let interp = run(
        r##"<div id="box"><span class="label">old</span></div>
           <getElementById target="box"><set title="boxed"></set></getElementById>
           <querySelector selector="#box > .label"><set innertext="new"></set></querySelector>
           <getElementById target="missing"><log message="never"></log></getElementById>"##,
    );
    let doc = interp.document();
    let box_el = by_id(&interp, "box");
    assert_eq!(doc.attribute(box_el, "title"), Some("boxed"));
    assert_eq!(doc.inner_html(box_el), r#"<span class="label">new</span>"#);
    assert!(interp.host().logs().is_empty());
}

#[test]
fn test_nested_scope_replaces_target_for_its_subtree_only() {
    let interp = run(
        r#"<div id="outer"></div><div id="inner"></div>
           <getElementById target="outer">
               <set data-step="1"></set>
               <getElementById target="inner"><set data-step="2"></set></getElementById>
               <set title="still outer"></set>
           </getElementById>"#,
    );
    let doc = interp.document();
    let outer = by_id(&interp, "outer");
    let inner = by_id(&interp, "inner");
    assert_eq!(doc.attribute(outer, "data-step"), Some("1"));
    assert_eq!(doc.attribute(outer, "title"), Some("still outer"));
    assert_eq!(doc.attribute(inner, "data-step"), Some("2"));
    assert_eq!(doc.attribute(inner, "title"), None);
}

#[test]
fn test_invalid_selector_is_reported_not_fatal() {
    let interp = run(
        r#"<querySelector selector="p:hover"><log message="never"></log></querySelector>
           <log message="after"></log>"#,
    );
    assert_eq!(interp.host().logs(), vec!["after"]);
}

#[test]
fn test_function_keeps_target_it_was_declared_under() {
    let interp = run(
        r#"<div id="a"></div>
           <getElementById target="a">
               <function name="mark"><set data-marked="true"></set></function>
           </getElementById>
           <call function="mark"></call>"#,
    );
    assert_eq!(
        interp.document().attribute(by_id(&interp, "a"), "data-marked"),
        Some("true")
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Set and Get
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_set_applies_every_attribute() {
    let interp = run(
        r#"<variable name="n" value="4" type="number"></variable>
           <div id="d" class="keep"></div>
           <getElementById target="d">
               <set data-raw="n + 1" style.color="red" title="n * 2" counter="n + 1"
                    class="ignored" innerhtml="<b>bold</b>"></set>
           </getElementById>"#,
    );
    let doc = interp.document();
    let d = by_id(&interp, "d");
    assert_eq!(doc.attribute(d, "data-raw"), Some("n + 1"));
    assert_eq!(doc.style(d, "color"), Some("red"));
    assert_eq!(doc.attribute(d, "title"), Some("8"));
    assert_eq!(doc.attribute(d, "class"), Some("keep"));
    assert_eq!(doc.get_property(d, "counter"), Value::Number(5.0));
    assert_eq!(doc.inner_html(d), "<b>bold</b>");
}

#[test]
fn test_set_style_accepts_camel_case_names() {
    let interp = run(
        r#"<div id="d"></div>
           <getElementById target="d">
               <set style.backgroundColor="blue" style.font-size="12px"></set>
           </getElementById>"#,
    );
    let doc = interp.document();
    let d = by_id(&interp, "d");
    assert_eq!(doc.style(d, "background-color"), Some("blue"));
    assert_eq!(doc.style(d, "fontSize"), Some("12px"));
    assert_eq!(doc.attribute(d, "style"), None);
}

#[test]
fn test_set_without_target_is_a_no_op() {
    let interp = run(r#"<set title="x"></set><log message="after"></log>"#);
    assert_eq!(interp.host().logs(), vec!["after"]);
}

#[test]
fn test_get_then_set_round_trips_value() {
    let interp = run(
        r#"<input id="src" value="hello">
           <input id="dst">
           <getElementById target="src"><get property="value" variable="x"></get></getElementById>
           <getElementById target="dst"><set value="x"></set></getElementById>"#,
    );
    let dst = by_id(&interp, "dst");
    assert_eq!(
        interp.document().get_property(dst, "value"),
        Value::string("hello")
    );
}

#[test]
fn test_get_then_set_keeps_object_identity() {
    let interp = run(
        r#"<variable name="obj" value='{"k": [1, 2]}' type="object"></variable>
           <div id="holder"></div>
           <getElementById target="holder">
               <set payload="obj"></set>
               <get property="payload" variable="copy"></get>
           </getElementById>"#,
    );
    let ns = interp.namespace();
    let original = ns.lookup_variable("obj").unwrap();
    let copy = ns.lookup_variable("copy").unwrap();
    assert!(copy.strict_equals(original));
}

#[test]
fn test_get_reads_computed_properties() {
    let interp = run(
        r#"<ul id="list"><li>a</li><li>b</li></ul>
           <getElementById target="list">
               <get property="childElementCount" variable="count"></get>
               <get property="tagName" variable="tag"></get>
               <get property="nothing" variable="missing"></get>
           </getElementById>"#,
    );
    let ns = interp.namespace();
    assert_eq!(ns.lookup_variable("count"), Some(&Value::Number(2.0)));
    assert_eq!(ns.lookup_variable("tag"), Some(&Value::string("UL")));
    assert_eq!(ns.lookup_variable("missing"), Some(&Value::Undefined));
}

// ═══════════════════════════════════════════════════════════════════════
// Create, Append and Remove
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_create_configures_node_before_it_is_attached() {
    let interp = run(
        r#"<div id="host"></div>
           <create tag="p" variable="para">
               <set innertext="made" data-kind="generated"></set>
           </create>
           <append target="host" source="para"></append>"#,
    );
    let doc = interp.document();
    assert_eq!(
        doc.inner_html(by_id(&interp, "host")),
        r#"<p data-kind="generated">made</p>"#
    );
    let para = interp
        .namespace()
        .lookup_variable("para")
        .and_then(Value::as_node)
        .unwrap();
    assert_eq!(doc.parent(para), Some(by_id(&interp, "host")));
}

#[test]
fn test_append_moves_existing_node() {
    let interp = run(
        r#"<div id="a"><span id="s"></span></div>
           <div id="b"></div>
           <append target="b" source="s"></append>"#,
    );
    let doc = interp.document();
    assert_eq!(doc.parent(by_id(&interp, "s")), Some(by_id(&interp, "b")));
    assert_eq!(doc.inner_html(by_id(&interp, "a")), "");
}

#[test]
fn test_append_falls_back_to_context_target() {
    let interp = run(
        r#"<section id="dest"></section>
           <create tag="em"><append target="dest"></append></create>"#,
    );
    assert_eq!(
        interp.document().inner_html(by_id(&interp, "dest")),
        "<em></em>"
    );
}

#[test]
fn test_remove_detaches_target() {
    let interp = run(
        r#"<div id="gone"></div>
           <getElementById target="gone"><remove></remove></getElementById>"#,
    );
    assert_eq!(interp.document().get_element_by_id("gone"), None);
}

#[test]
fn test_remove_without_parent_is_a_no_op() {
    let interp = run(
        r#"<create tag="div" variable="d"><remove></remove></create>
           <log message="after"></log>"#,
    );
    let d = interp
        .namespace()
        .lookup_variable("d")
        .and_then(Value::as_node)
        .unwrap();
    assert_eq!(interp.document().parent(d), None);
    assert_eq!(interp.host().logs(), vec!["after"]);
}

// ═══════════════════════════════════════════════════════════════════════
// Visibility
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_show_hide_toggle() {
    let interp = run(
        r#"<div id="a" style="display: none"></div>
           <div id="b"></div>
           <div id="c"></div>
           <getElementById target="a"><show></show></getElementById>
           <getElementById target="b"><hide></hide></getElementById>
           <getElementById target="c"><toggle></toggle><toggle></toggle><toggle></toggle></getElementById>"#,
    );
    let doc = interp.document();
    assert!(!doc.is_hidden(by_id(&interp, "a")));
    assert!(doc.is_hidden(by_id(&interp, "b")));
    assert!(doc.is_hidden(by_id(&interp, "c")));
}

#[test]
fn test_directives_are_hidden_after_running() {
    let interp = run(r#"<log message="x"></log><p id="content">text</p>"#);
    let doc = interp.document();
    let log = doc.query_selector("log").unwrap().unwrap();
    assert!(doc.is_hidden(log));
    assert!(!doc.is_hidden(by_id(&interp, "content")));
}

#[test]
fn test_hiding_can_be_disabled() {
    let mut interp = Interpreter::from_markup(r#"<log message="x"></log>"#, RecordingHost::new())
        .unwrap()
        .with_context(ExecContext::new().with_hide_directives(false));
    interp.run();
    let doc = interp.document();
    let log = doc.query_selector("log").unwrap().unwrap();
    assert!(!doc.is_hidden(log));
}
