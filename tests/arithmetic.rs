use sol25::{ErrorCode, Interpreter};

fn program(body: &str) -> String {
    format!(
        r#"<program language="SOL25"><class name="Main" parent="Object"><method selector="run"><block arity="0">{}</block></method></class></program>"#,
        body
    )
}

fn run_ok(body: &str) -> String {
    Interpreter::new().run(&program(body)).expect("program runs")
}

fn run_err(body: &str) -> sol25::RuntimeError {
    Interpreter::new()
        .run(&program(body))
        .expect_err("program must fail")
}

#[test]
fn nested_arithmetic_prints_twenty() {
    // (2 plus: 3) multiplyBy: 4
    let output = run_ok(
        r#"<assign order="1"><var name="n"/><expr><send selector="multiplyBy:"><expr><send selector="plus:"><expr><literal class="Integer" value="2"/></expr><arg order="1"><expr><literal class="Integer" value="3"/></expr></arg></send></expr><arg order="1"><expr><literal class="Integer" value="4"/></expr></arg></send></expr></assign>
           <assign order="2"><var name="s"/><expr><send selector="print"><expr><send selector="asString"><expr><var name="n"/></expr></send></expr></send></expr></assign>"#,
    );
    assert_eq!(output, "20");
}

#[test]
fn subtraction_can_go_negative() {
    let output = run_ok(
        r#"<assign order="1"><var name="n"/><expr><send selector="minus:"><expr><literal class="Integer" value="3"/></expr><arg order="1"><expr><literal class="Integer" value="10"/></expr></arg></send></expr></assign>
           <assign order="2"><var name="s"/><expr><send selector="print"><expr><send selector="asString"><expr><var name="n"/></expr></send></expr></send></expr></assign>"#,
    );
    assert_eq!(output, "-7");
}

#[test]
fn division_truncates() {
    let output = run_ok(
        r#"<assign order="1"><var name="n"/><expr><send selector="divBy:"><expr><literal class="Integer" value="7"/></expr><arg order="1"><expr><literal class="Integer" value="2"/></expr></arg></send></expr></assign>
           <assign order="2"><var name="s"/><expr><send selector="print"><expr><send selector="asString"><expr><var name="n"/></expr></send></expr></send></expr></assign>"#,
    );
    assert_eq!(output, "3");
}

#[test]
fn division_by_zero_is_a_value_error() {
    let err = run_err(
        r#"<assign order="1"><var name="x"/><expr><send selector="divBy:"><expr><literal class="Integer" value="10"/></expr><arg order="1"><expr><literal class="Integer" value="0"/></expr></arg></send></expr></assign>"#,
    );
    assert_eq!(err.code, ErrorCode::ValueError);
}

#[test]
fn arithmetic_with_a_string_operand_is_a_value_error() {
    let err = run_err(
        r#"<assign order="1"><var name="x"/><expr><send selector="plus:"><expr><literal class="Integer" value="1"/></expr><arg order="1"><expr><literal class="String" value="two"/></expr></arg></send></expr></assign>"#,
    );
    assert_eq!(err.code, ErrorCode::ValueError);
}

#[test]
fn greater_than_drives_branch_selection() {
    let output = run_ok(
        r#"<assign order="1"><var name="r"/><expr><send selector="ifTrue:ifFalse:"><expr><send selector="greaterThan:"><expr><literal class="Integer" value="5"/></expr><arg order="1"><expr><literal class="Integer" value="3"/></expr></arg></send></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="t"/><expr><send selector="print"><expr><literal class="String" value="gt"/></expr></send></expr></assign></block></expr></arg><arg order="2"><expr><block arity="0"><assign order="1"><var name="t"/><expr><send selector="print"><expr><literal class="String" value="le"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>"#,
    );
    assert_eq!(output, "gt");
}

#[test]
fn as_string_as_integer_round_trip() {
    // ((42 asString) asInteger equalTo: 42)
    let output = run_ok(
        r#"<assign order="1"><var name="r"/><expr><send selector="ifTrue:ifFalse:"><expr><send selector="equalTo:"><expr><send selector="asInteger"><expr><send selector="asString"><expr><literal class="Integer" value="42"/></expr></send></expr></send></expr><arg order="1"><expr><literal class="Integer" value="42"/></expr></arg></send></expr><arg order="1"><expr><block arity="0"><assign order="1"><var name="t"/><expr><send selector="print"><expr><literal class="String" value="same"/></expr></send></expr></assign></block></expr></arg><arg order="2"><expr><block arity="0"><assign order="1"><var name="t"/><expr><send selector="print"><expr><literal class="String" value="different"/></expr></send></expr></assign></block></expr></arg></send></expr></assign>"#,
    );
    assert_eq!(output, "same");
}

#[test]
fn as_integer_on_an_integer_is_itself() {
    let output = run_ok(
        r#"<assign order="1"><var name="s"/><expr><send selector="print"><expr><send selector="asString"><expr><send selector="asInteger"><expr><literal class="Integer" value="9"/></expr></send></expr></send></expr></send></expr></assign>"#,
    );
    assert_eq!(output, "9");
}
