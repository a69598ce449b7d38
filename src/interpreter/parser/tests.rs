use super::*;

fn int(value: i64) -> Expr {
    Expr::ConstantInt(value)
}

fn var(name: &str) -> Expr {
    Expr::Variable(name.to_owned())
}

fn print(expr: Expr) -> Stmt {
    Stmt::Print(expr)
}

fn assign(name: &str, expr: Expr) -> Stmt {
    Stmt::Assign { name: name.to_owned(), expr }
}

mod expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_multiplication_binds_tighter() {
        assert_eq!(Ok(vec![print(Expr::binary(int(2), Operator::Add, Expr::binary(int(3), Operator::Multiply, int(4))))]),
                   parse("print 2 + 3 * 4"));
    }

    #[test]
    pub fn test_parentheses() {
        assert_eq!(Ok(vec![print(Expr::binary(Expr::binary(int(2), Operator::Add, int(3)), Operator::Multiply, int(4)))]),
                   parse("print (2 + 3) * 4"));
    }

    #[test]
    pub fn test_left_associative() {
        assert_eq!(Ok(vec![print(Expr::binary(Expr::binary(int(10), Operator::Subtract, int(3)), Operator::Subtract, int(2)))]),
                   parse("print 10 - 3 - 2"));
        assert_eq!(Ok(vec![print(Expr::binary(Expr::binary(int(8), Operator::Divide, int(4)), Operator::Multiply, int(2)))]),
                   parse("print 8 / 4 * 2"));
    }

    #[test]
    pub fn test_comparison_shares_additive_level() {
        assert_eq!(Ok(vec![print(Expr::binary(Expr::binary(int(1), Operator::Add, int(1)), Operator::Greater, int(1)))]),
                   parse("print 1 + 1 > 1"));
        // `1 > 0 + 1` is `(1 > 0) + 1`, not `1 > (0 + 1)`
        assert_eq!(Ok(vec![print(Expr::binary(Expr::binary(int(1), Operator::Greater, int(0)), Operator::Add, int(1)))]),
                   parse("print 1 > 0 + 1"));
        assert_eq!(Ok(vec![print(Expr::binary(Expr::binary(var("a"), Operator::Greater, var("b")), Operator::Greater, var("c")))]),
                   parse("print a > b > c"));
    }

    #[test]
    pub fn test_all_operators() {
        let statements = parse("print a + b - c * d / e > f < g >= h <= i == j != k").unwrap();

        assert_eq!("[print ((((((((a + b) - ((c * d) / e)) > f) < g) >= h) <= i) == j) != k)]",
                   format!("{:?}", statements));
    }

    #[test]
    pub fn test_nested_parentheses() {
        assert_eq!(Ok(vec![print(Expr::binary(var("x"), Operator::Multiply, Expr::binary(int(1), Operator::Subtract, Expr::binary(int(2), Operator::Subtract, int(3)))))]),
                   parse("print x * (1 - (2 - 3))"));
    }
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_assignment() {
        assert_eq!(Ok(vec![
            assign("x", int(5)),
            print(Expr::binary(var("x"), Operator::Add, int(1))),
        ]), parse("x = 5\nprint x + 1"));
    }

    #[test]
    pub fn test_if_else() {
        assert_eq!(Ok(vec![
            assign("x", int(0)),
            Stmt::If {
                condition: Expr::binary(var("x"), Operator::Greater, int(0)),
                then: vec![print(int(1))],
                otherwise: vec![print(int(2))],
            },
        ]), parse("x = 0\nif x > 0\nprint 1\nelse\nprint 2\nend"));
    }

    #[test]
    pub fn test_if_without_else() {
        assert_eq!(Ok(vec![Stmt::If {
            condition: var("x"),
            then: vec![print(int(1)), print(int(2))],
            otherwise: vec![],
        }]), parse("if x print 1 print 2 end"));
    }

    #[test]
    pub fn test_empty_blocks() {
        assert_eq!(Ok(vec![
            Stmt::If { condition: int(1), then: vec![], otherwise: vec![] },
            Stmt::While { condition: int(0), body: vec![] },
        ]), parse("if 1 else end while 0 end"));
    }

    #[test]
    pub fn test_while() {
        assert_eq!(Ok(vec![
            assign("i", int(0)),
            Stmt::While {
                condition: Expr::binary(var("i"), Operator::Less, int(3)),
                body: vec![
                    print(var("i")),
                    assign("i", Expr::binary(var("i"), Operator::Add, int(1))),
                ],
            },
        ]), parse("i = 0\nwhile i < 3\nprint i\ni = i + 1\nend"));
    }

    #[test]
    pub fn test_nested_blocks() {
        let statements = parse("while i < 10\n  if i == 5\n    print i\n  end\n  i = i + 1\nend").unwrap();

        assert_eq!("[while (i < 10) { if (i == 5) { print i }; i = (i + 1) }]", format!("{:?}", statements));
    }

    #[test]
    pub fn test_separators_are_optional() {
        let with_separators = parse("x = 1; print x;;\n; if x; print 2; end;").unwrap();
        let without_separators = parse("x = 1 print x if x print 2 end").unwrap();

        assert_eq!(without_separators, with_separators);
    }

    #[test]
    pub fn test_empty_program() {
        assert_eq!(Ok(vec![]), parse(""));
        assert_eq!(Ok(vec![]), parse(" ;\n; "));
    }

    #[test]
    pub fn test_parse_is_repeatable() {
        let source = "a = 3\nwhile a > 0\nif a == 2 print a else print 0 end\na = a - 1\nend";

        assert_eq!(parse(source), parse(source));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_missing_assign() {
        assert_eq!(Err(ParseError::ExpectedToken {
            pos: TokenPos::new(1, 3),
            expected: TokenType::Assign,
            context: "after variable name",
            found: String::from("`5`"),
        }), parse("x 5"));
    }

    #[test]
    pub fn test_missing_end() {
        let error = parse("if 1\nprint 1\n").unwrap_err();

        assert_eq!(ParseError::ExpectedToken {
            pos: TokenPos::new(3, 1),
            expected: TokenType::End,
            context: "to close 'if' block",
            found: String::from("end of input"),
        }, error);
        assert_eq!("[line 3 column 1] Expected 'end' to close 'if' block, found end of input", error.to_string());
    }

    #[test]
    pub fn test_missing_end_after_while() {
        assert!(matches!(parse("while 1 print 1"),
            Err(ParseError::ExpectedToken { expected: TokenType::End, context: "to close 'while' block", .. })));
        // `else` only belongs to `if`
        assert!(matches!(parse("while 1 print 1 else end"), Err(ParseError::ExpectedStatement { .. })));
    }

    #[test]
    pub fn test_missing_parenthesis() {
        assert!(matches!(parse("print (1 + 2"),
            Err(ParseError::ExpectedToken { expected: TokenType::ParenthesisRight, .. })));
    }

    #[test]
    pub fn test_stray_end() {
        assert_eq!(Err(ParseError::ExpectedStatement { pos: TokenPos::new(1, 9), found: String::from("`end`") }),
                   parse("print 1 end"));
    }

    #[test]
    pub fn test_expression_at_statement_start() {
        assert!(matches!(parse("5 + 1"), Err(ParseError::ExpectedStatement { .. })));
    }

    #[test]
    pub fn test_missing_operand() {
        assert_eq!(Err(ParseError::ExpectedExpression { pos: TokenPos::new(1, 10), found: String::from("end of input") }),
                   parse("print 1 +"));
        assert!(matches!(parse("print * 2"), Err(ParseError::ExpectedExpression { .. })));
    }

    #[test]
    pub fn test_keyword_as_variable() {
        assert!(matches!(parse("while = 1"), Err(ParseError::ExpectedExpression { .. })));
        assert!(matches!(parse("print = 1"), Err(ParseError::ExpectedExpression { .. })));
    }

    #[test]
    pub fn test_int_literal_out_of_range() {
        let error = parse("print 99999999999999999999").unwrap_err();

        assert!(matches!(error, ParseError::InvalidInt { .. }));
        assert_eq!(TokenPos::new(1, 7), error.pos());
    }

    #[test]
    pub fn test_lexer_error() {
        assert_eq!(Err(ParseError::Lexer(LexerError::UnexpectedCharacter(TokenPos::new(2, 7), '$'))),
                   parse("x = 1\nprint $x"));
    }

    #[test]
    pub fn test_long_sum_is_too_deep() {
        let at_limit = format!("print 0{}", " + 1".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let over_limit = format!("print 0{}", " + 1".repeat(100_000));
        assert!(matches!(parse(&over_limit), Err(ParseError::TooDeep { .. })));
    }

    #[test]
    pub fn test_nested_parentheses_are_too_deep() {
        let at_limit = format!("print {}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let over_limit = format!("print {}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let error = parse(&over_limit).unwrap_err();

        assert_eq!(ParseError::TooDeep { pos: TokenPos::new(1, 7 + MAX_DEPTH as u32) }, error);
        assert_eq!(format!("[line 1 column {}] Program nests too deeply (limit is 256)", 7 + MAX_DEPTH), error.to_string());
    }

    #[test]
    pub fn test_nested_blocks_are_too_deep() {
        let over_limit = format!("{}print 1{}", "if 1 ".repeat(100_000), " end".repeat(100_000));
        assert!(matches!(parse(&over_limit), Err(ParseError::TooDeep { .. })));

        let while_over_limit = format!("{}x = 1{}", "while 0 ".repeat(MAX_DEPTH + 1), " end".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&while_over_limit), Err(ParseError::TooDeep { .. })));
    }
}
