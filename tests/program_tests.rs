use minimal_basic::{BasicError, BufferConsole, Interpreter, ProgramStore, Statement};

/// Helper to feed lines to an interpreter and collect everything it printed
fn session(lines: &[&str]) -> (Interpreter, String) {
    let mut interpreter = Interpreter::new();
    let mut console = BufferConsole::new();
    for line in lines {
        interpreter.process_line(line, &mut console).unwrap();
    }
    (interpreter, console.take_output())
}

fn traverse(program: &ProgramStore) -> Vec<u32> {
    let mut numbers = Vec::new();
    let mut current = program.first();
    while let Some(number) = current {
        numbers.push(number);
        current = program.next(number).unwrap();
    }
    numbers
}

#[test]
fn test_lines_listed_in_numeric_order() {
    let (_, output) = session(&["100 END", "9 REM start", "50 PRINT 1", "LIST"]);
    assert_eq!(output, "9 REM start\n50 PRINT 1\n100 END\n");
}

#[test]
fn test_insert_between_existing_lines() {
    let (interpreter, _) = session(&["10 PRINT 1", "30 PRINT 3", "20 PRINT 2"]);
    assert_eq!(traverse(interpreter.program()), vec![10, 20, 30]);
}

#[test]
fn test_reentered_line_is_replaced() {
    let mut program = ProgramStore::new();
    program.add_or_replace(10, "10 END");
    program.set_parsed(10, Statement::End).unwrap();
    program.add_or_replace(10, "10 PRINT 2");

    assert!(program.parsed_statement(10).is_none());
    assert_eq!(program.raw_text(10), "10 PRINT 2");
    assert_eq!(traverse(&program), vec![10]);
}

#[test]
fn test_remove_absent_line() {
    let (mut interpreter, _) = session(&["10 PRINT 1", "20 PRINT 2"]);
    interpreter.program_mut().remove(15);
    assert_eq!(traverse(interpreter.program()), vec![10, 20]);
    assert_eq!(interpreter.program().raw_text(20), "20 PRINT 2");
}

#[test]
fn test_unparsable_line_is_listed() {
    let mut interpreter = Interpreter::new();
    let mut console = BufferConsole::new();
    let error = interpreter
        .process_line("10 PRINT 1 +", &mut console)
        .unwrap_err();
    assert!(matches!(error, BasicError::SyntaxError { line: Some(10), .. }));

    interpreter.process_line("LIST", &mut console).unwrap();
    assert_eq!(console.output(), "10 PRINT 1 +\n");
}

#[test]
fn test_clear_is_idempotent() {
    let (mut interpreter, _) = session(&["10 PRINT 1", "CLEAR", "CLEAR"]);
    assert!(interpreter.program().is_empty());

    interpreter.program_mut().clear();
    assert!(interpreter.program().is_empty());
    assert_eq!(interpreter.program().first(), None);
}

#[test]
fn test_set_parsed_requires_line() {
    let mut program = ProgramStore::new();
    assert_eq!(
        program.set_parsed(10, Statement::End),
        Err(BasicError::LineNotFound(10))
    );
    assert_eq!(program.raw_text(10), "");
}
