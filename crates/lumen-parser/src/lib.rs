pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_lexer::Lexer;
    use lumen_syntax::ast::*;
    use lumen_syntax::error::{Error, ErrorKind};

    fn parse_str(input: &str) -> Result<Ast, Error> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize();
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    fn parse_ok(input: &str) -> Ast {
        parse_str(input).expect("Parsing should succeed")
    }

    fn top(ast: &Ast) -> &Node {
        ast.node(ast.top().expect("tree has a top node")).unwrap()
    }

    fn kinds_of_children(ast: &Ast, id: NodeId) -> Vec<NodeKind> {
        ast.node(id)
            .unwrap()
            .children()
            .iter()
            .map(|e| ast.node(e.child).unwrap().kind)
            .collect()
    }

    #[test]
    fn test_literals_and_variables() {
        let ast = parse_ok("42");
        assert_eq!(top(&ast).kind, NodeKind::Number);
        assert_eq!(top(&ast).value, Literal::Int(42));

        let ast = parse_ok("2.5");
        assert_eq!(top(&ast).value, Literal::Float(2.5));

        let ast = parse_ok("\"img.png\"");
        assert_eq!(top(&ast).kind, NodeKind::Str);
        assert_eq!(top(&ast).value, Literal::Str("img.png".into()));

        let ast = parse_ok("width");
        assert_eq!(top(&ast).kind, NodeKind::Variable);
        assert_eq!(top(&ast).label, "VAR_width");
    }

    #[test]
    fn test_root_is_node_zero_with_one_child() {
        let ast = parse_ok("1 + 2");
        let root = ast.root().unwrap();
        assert_eq!(root.index(), 0);
        assert_eq!(ast.node(root).unwrap().kind, NodeKind::Initial);
        assert_eq!(ast.node(root).unwrap().children().len(), 1);
        assert!(ast.validate().is_ok());
    }

    #[test]
    fn test_children_allocated_before_parents() {
        let ast = parse_ok("(1 + 2) * f(3, x) - 4 ^ 2");
        for node in ast.iter().filter(|n| n.kind != NodeKind::Initial) {
            for edge in node.children() {
                assert!(edge.child < node.id, "{} should precede {}", edge.child, node.id);
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        let ast = parse_ok("2 + 3 * 4");
        assert_eq!(top(&ast).kind, NodeKind::Plus);
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Number, NodeKind::Times]
        );

        let ast = parse_ok("(2 + 3) * 4");
        assert_eq!(top(&ast).kind, NodeKind::Times);
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Group, NodeKind::Number]
        );

        let ast = parse_ok("2 * 3 ^ 2");
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Number, NodeKind::Power]
        );
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        let ast = parse_ok("10 - 4 - 3");
        assert_eq!(top(&ast).kind, NodeKind::Minus);
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Minus, NodeKind::Number]
        );
    }

    #[test]
    fn test_comparisons_bind_looser_than_arithmetic() {
        let cases = [
            ("1 > 2", NodeKind::Gt),
            ("1 < 2", NodeKind::Lt),
            ("1 >= 2", NodeKind::Ge),
            ("1 <= 2", NodeKind::Le),
            ("1 == 2", NodeKind::Eq),
            ("1 != 2", NodeKind::Ne),
        ];
        for (input, kind) in cases {
            assert_eq!(top(&parse_ok(input)).kind, kind, "input: {}", input);
        }
        let ast = parse_ok("1 + 2 > 3 * 4");
        assert_eq!(top(&ast).kind, NodeKind::Gt);
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Plus, NodeKind::Times]
        );
    }

    #[test]
    fn test_chained_comparison_groups_left() {
        let ast = parse_ok("1 < 2 < 3");
        assert_eq!(top(&ast).kind, NodeKind::Lt);
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Lt, NodeKind::Number]
        );
    }

    #[test]
    fn test_logical_operators() {
        let ast = parse_ok("(2==2) && (1!=1)");
        assert_eq!(top(&ast).kind, NodeKind::And);
        let ast = parse_ok("a || b && c");
        assert_eq!(top(&ast).kind, NodeKind::Or);
        assert_eq!(
            kinds_of_children(&ast, top(&ast).id),
            vec![NodeKind::Variable, NodeKind::And]
        );
    }

    #[test]
    fn test_assignment_shape() {
        let ast = parse_ok("x = 5");
        let assign = top(&ast);
        assert_eq!(assign.kind, NodeKind::Assign);
        let children = assign.children();
        assert_eq!(children.len(), 2);
        let target = ast.node(children[0].child).unwrap();
        assert_eq!(target.kind, NodeKind::VariableAssign);
        assert_eq!(target.value, Literal::Name("x".into()));
        assert_eq!(ast.node(children[1].child).unwrap().value, Literal::Int(5));
    }

    #[test]
    fn test_function_call_arguments_keep_order() {
        let ast = parse_ok("max(1, 2.5, y)");
        let call = top(&ast);
        assert_eq!(call.kind, NodeKind::FunctionCall);
        assert_eq!(call.value, Literal::Name("max".into()));
        let values: Vec<&Literal> = call
            .children()
            .iter()
            .map(|e| &ast.node(e.child).unwrap().value)
            .collect();
        assert_eq!(
            values,
            vec![&Literal::Int(1), &Literal::Float(2.5), &Literal::Name("y".into())]
        );

        let ast = parse_ok("now()");
        assert!(top(&ast).children().is_empty());
    }

    #[test]
    fn test_keyword_conditional_roles() {
        let ast = parse_ok("if (10==20): 8+11");
        let node = top(&ast);
        assert_eq!(node.kind, NodeKind::If);
        assert_eq!(node.children().len(), 2);
        let cond = node.child(EdgeRole::Condition).unwrap();
        assert_eq!(ast.node(cond).unwrap().kind, NodeKind::Eq);
        let then = node.child(EdgeRole::Expression).unwrap();
        assert_eq!(ast.node(then).unwrap().kind, NodeKind::Plus);
        assert!(node.child(EdgeRole::Alternate).is_none());

        let ast = parse_ok("if (1==1): 8-10 else: 9+14");
        let node = top(&ast);
        assert_eq!(node.children().len(), 3);
        let alt = node.child(EdgeRole::Alternate).unwrap();
        assert_eq!(ast.node(alt).unwrap().kind, NodeKind::Plus);
    }

    #[test]
    fn test_ternary_matches_keyword_shape() {
        let ternary = parse_ok("(33 > 22)?(3):(0)");
        let keyword = parse_ok("if (33 > 22): 3 else: 0");
        let shape = |ast: &Ast| -> Vec<(EdgeRole, NodeKind)> {
            top(ast)
                .children()
                .iter()
                .map(|e| (e.role, ast.node(e.child).unwrap().kind))
                .collect()
        };
        assert_eq!(top(&ternary).kind, NodeKind::If);
        assert_eq!(shape(&ternary), shape(&keyword));
        assert_eq!(
            shape(&ternary),
            vec![
                (EdgeRole::Condition, NodeKind::Gt),
                (EdgeRole::Expression, NodeKind::Number),
                (EdgeRole::Alternate, NodeKind::Number),
            ]
        );
    }

    #[test]
    fn test_flow_desugars_to_nested_calls() {
        let ast = parse_ok("out = img -> blur(3) -> gray()");
        let assign = top(&ast);
        let outer = ast.node(assign.children()[1].child).unwrap();
        assert_eq!(outer.label, "FUN_gray");
        assert_eq!(outer.children().len(), 1);
        let inner = ast.node(outer.children()[0].child).unwrap();
        assert_eq!(inner.label, "FUN_blur");
        assert_eq!(
            kinds_of_children(&ast, inner.id),
            vec![NodeKind::Variable, NodeKind::Number]
        );
    }

    #[test]
    fn test_strings_only_open_an_additive_chain() {
        assert!(parse_str("\"a\" + 1").is_ok());
        assert!(parse_str("x == \"b\"").is_ok());
        assert!(parse_str("f(\"a\", 1)").is_ok());
        assert!(parse_str("1 + \"a\"").is_err());
        assert!(parse_str("\"a\" * 2").is_err());
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            "",
            "1 +",
            "(1 + 2",
            "2 ^ 3 ^ 2",
            "f(1,)",
            "if 1: 2",
            "(1)?(2)",
            "img -> blur(3)",
            "x = 1 = 2",
            "3 4",
            "- 3",
        ];
        for input in cases {
            let err = parse_str(input).expect_err(input);
            assert_eq!(err.kind, ErrorKind::Syntax, "input: {}", input);
            assert!(err.line.is_some(), "input: {}", input);
        }
    }

    #[test]
    fn test_syntax_error_messages() {
        let err = parse_str("(1 + 2").unwrap_err();
        assert_eq!(err.msg, "Expected ')', found end of input");
        let err = parse_str("3 4").unwrap_err();
        assert_eq!(err.msg, "Unexpected token '4'");
        assert_eq!((err.line, err.col), (Some(1), Some(3)));
    }
}
