use sol25::Interpreter;

fn program(body: &str) -> String {
    format!(
        r#"<program language="SOL25"><class name="Main" parent="Object"><method selector="run"><block arity="0">{}</block></method></class></program>"#,
        body
    )
}

fn run_ok(body: &str) -> String {
    Interpreter::new().run(&program(body)).expect("program runs")
}

/// `self i` attribute read.
const READ_I: &str = r#"<send selector="i"><expr><var name="self"/></expr></send>"#;

#[test]
fn while_loop_counts_to_three() {
    // self i: 1.
    // [ (self i greaterThan: 3) not ] whileTrue:
    //   [ self i asString print. '\n' print. self i: (self i plus: 1) ]
    let body = format!(
        r#"<assign order="1"><var name="a"/><expr><send selector="i:"><expr><var name="self"/></expr><arg order="1"><expr><literal class="Integer" value="1"/></expr></arg></send></expr></assign>
           <assign order="2"><var name="b"/><expr><send selector="whileTrue:">
             <expr><block arity="0">
               <assign order="1"><var name="c"/><expr><send selector="not"><expr><send selector="greaterThan:"><expr>{read_i}</expr><arg order="1"><expr><literal class="Integer" value="3"/></expr></arg></send></expr></send></expr></assign>
             </block></expr>
             <arg order="1"><expr><block arity="0">
               <assign order="1"><var name="d"/><expr><send selector="print"><expr><send selector="asString"><expr>{read_i}</expr></send></expr></send></expr></assign>
               <assign order="2"><var name="e"/><expr><send selector="print"><expr><literal class="String" value="\n"/></expr></send></expr></assign>
               <assign order="3"><var name="f"/><expr><send selector="i:"><expr><var name="self"/></expr><arg order="1"><expr><send selector="plus:"><expr>{read_i}</expr><arg order="1"><expr><literal class="Integer" value="1"/></expr></arg></send></expr></arg></send></expr></assign>
             </block></expr></arg>
           </send></expr></assign>"#,
        read_i = READ_I
    );
    assert_eq!(run_ok(&body), "1\n2\n3\n");
}

#[test]
fn while_loop_with_a_false_condition_never_runs_its_body() {
    let body = r#"<assign order="1"><var name="b"/><expr><send selector="whileTrue:">
      <expr><block arity="0"><assign order="1"><var name="c"/><expr><var name="false"/></expr></assign></block></expr>
      <arg order="1"><expr><block arity="0"><assign order="1"><var name="d"/><expr><send selector="print"><expr><literal class="String" value="never"/></expr></send></expr></assign></block></expr></arg>
    </send></expr></assign>
    <assign order="2"><var name="z"/><expr><send selector="print"><expr><literal class="String" value="after"/></expr></send></expr></assign>"#;
    assert_eq!(run_ok(body), "after");
}

#[test]
fn times_repeat_passes_one_based_indices() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="timesRepeat:"><expr><literal class="Integer" value="3"/></expr><arg order="1"><expr><block arity="1"><parameter name="k" order="1"/><assign order="1"><var name="p"/><expr><send selector="print"><expr><send selector="asString"><expr><var name="k"/></expr></send></expr></send></expr></assign></block></expr></arg></send></expr></assign>"#;
    assert_eq!(run_ok(body), "123");
}

#[test]
fn times_repeat_on_a_non_positive_count_is_a_no_op() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="timesRepeat:"><expr><literal class="Integer" value="-2"/></expr><arg order="1"><expr><block arity="1"><parameter name="k" order="1"/><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="x"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>
    <assign order="2"><var name="s"/><expr><send selector="print"><expr><send selector="asString"><expr><var name="r"/></expr></send></expr></send></expr></assign>"#;
    // timesRepeat: answers its receiver.
    assert_eq!(run_ok(body), "-2");
}

#[test]
fn and_short_circuits_on_false() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="and:"><expr><var name="false"/></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="side"/></expr></send></expr></assign><assign order="2"><var name="v"/><expr><var name="true"/></expr></assign></block></expr></arg></send></expr></assign>
    <assign order="2"><var name="done"/><expr><send selector="print"><expr><literal class="String" value="end"/></expr></send></expr></assign>"#;
    assert_eq!(run_ok(body), "end");
}

#[test]
fn and_evaluates_its_block_exactly_once_on_true() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="and:"><expr><var name="true"/></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="once"/></expr></send></expr></assign><assign order="2"><var name="v"/><expr><var name="true"/></expr></assign></block></expr></arg></send></expr></assign>"#;
    assert_eq!(run_ok(body), "once");
}

#[test]
fn or_short_circuits_on_true() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="or:"><expr><var name="true"/></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="side"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>
    <assign order="2"><var name="done"/><expr><send selector="print"><expr><literal class="String" value="end"/></expr></send></expr></assign>"#;
    assert_eq!(run_ok(body), "end");
}

#[test]
fn or_evaluates_its_block_on_false() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="or:"><expr><var name="false"/></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="taken"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>"#;
    assert_eq!(run_ok(body), "taken");
}

#[test]
fn if_true_if_false_takes_the_false_branch_for_false() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="ifTrue:ifFalse:"><expr><var name="false"/></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="then"/></expr></send></expr></assign></block></expr></arg><arg order="2"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="else"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>"#;
    assert_eq!(run_ok(body), "else");
}

#[test]
fn not_inverts_both_singletons() {
    let body = r#"<assign order="1"><var name="r"/><expr><send selector="ifTrue:ifFalse:"><expr><send selector="not"><expr><var name="false"/></expr></send></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="yes"/></expr></send></expr></assign></block></expr></arg><arg order="2"><expr><block arity="0"><assign order="1"><var name="p"/><expr><send selector="print"><expr><literal class="String" value="no"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>"#;
    assert_eq!(run_ok(body), "yes");
}
