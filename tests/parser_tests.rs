// Integration tests for the shading description parser

use fxparse::parser::ast::{Value, ValueKind};
use fxparse::{
    parse, BuiltinSet, EnumResolver, ErrorKind, FnSink, ParseError, ParserConfig, ShaderParser,
    TableEnum,
};
use std::sync::Arc;

fn parse_collecting(source: &str) -> (Result<ShaderParser, ParseError>, Vec<ParseError>) {
    let mut parser = ShaderParser::new();
    let mut errors: Vec<ParseError> = Vec::new();
    let result = parser.parse("test.fx", source, Some(&mut errors));
    (result.map(|_| parser), errors)
}

#[test]
fn test_struct_members_in_order() {
    let source = r#"
        struct S
        {
            uint a;
            uint b;
        };
    "#;

    let module = parse("test.fx", source, None).expect("Parsing failed");
    let user: Vec<_> = module.user_structs().collect();
    assert_eq!(user.len(), 1);

    let ast = module.ast();
    let ty = ast.structs[user[0]].ty;
    let members: Vec<&str> = ast.types[ty]
        .members
        .iter()
        .map(|&m| ast.declarations[m].name.as_str())
        .collect();
    assert_eq!(members, vec!["a", "b"]);
}

#[test]
fn test_struct_redefinition() {
    let mut parser = ShaderParser::new();
    let mut errors: Vec<ParseError> = Vec::new();
    let err = parser
        .parse(
            "test.fx",
            "struct S { uint a; };\nstruct S { float b; float c; };",
            Some(&mut errors),
        )
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::TypeRedefinition);
    assert_eq!(err.message, "'S': 'struct' type redefinition.");
    assert_eq!(errors.len(), 1);

    let ty = parser.symbols().lookup_type("S").unwrap();
    let members = &parser.ast().types[ty].members;
    assert_eq!(members.len(), 1);
    assert_eq!(parser.ast().declarations[members[0]].name, "a");
}

#[test]
fn test_prelude_struct_redefinition() {
    let (result, errors) = parse_collecting("struct SamplerState { uint x; };");
    let err = result.err().expect("Expected redefinition");
    assert_eq!(err.kind, ErrorKind::TypeRedefinition);
    assert_eq!(errors, vec![err]);
}

#[test]
fn test_invalid_enum_value_lists_symbols() {
    let (result, _) = parse_collecting("SamplerState s = { .AddressU = REPEAT };");
    let err = result.err().expect("Expected invalid value");

    assert_eq!(err.kind, ErrorKind::InvalidValue);
    assert_eq!(
        err.message,
        "'REPEAT': Invalid value. Expecting enum value for 'AddressingMode'. Valid values are:\n \
         - WRAP\n - MIRROR\n - CLAMP\n - BORDER\n"
    );
    for name in ["WRAP", "MIRROR", "CLAMP", "BORDER"] {
        assert_eq!(err.message.matches(&format!(" - {}\n", name)).count(), 1);
    }
}

#[test]
fn test_body_capture_nested_groups() {
    let module = parse("test.fx", "void f() { { } ( [ ] ) }", None).expect("Parsing failed");
    let f = module.find_function("f").unwrap();
    let decl = &module.ast().declarations[f];

    assert!(decl.is_function);
    assert_eq!(decl.body.as_deref(), Some(" { } ( [ ] ) "));
}

#[test]
fn test_body_keeps_non_ascii_text() {
    let module = parse("test.fx", "void f() { float é = 1; }", None).expect("Parsing failed");
    let f = module.find_function("f").unwrap();
    assert_eq!(
        module.ast().declarations[f].body.as_deref(),
        Some(" float é = 1; ")
    );

    let (result, _) = parse_collecting("uint x; é");
    let err = result.err().expect("Expected failure");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.message, "'é': Unexpected token.");
}

#[test]
fn test_body_unmatched_parenthesis() {
    let (result, _) = parse_collecting("void f() { ( }");
    let err = result.err().expect("Expected failure");
    assert_eq!(err.kind, ErrorKind::UnmatchedParenthesis);
}

#[test]
fn test_body_stray_closer() {
    let (result, _) = parse_collecting("void f() { ) }");
    assert_eq!(result.err().unwrap().kind, ErrorKind::UnmatchedParenthesis);

    let (result, _) = parse_collecting("void f() { [ ] ] }");
    assert_eq!(result.err().unwrap().kind, ErrorKind::UnmatchedBracket);
}

#[test]
fn test_reserved_keyword_as_name() {
    for source in [
        "uint static;",
        "float uniform = 1.0;",
        "struct const { uint a; };",
        "struct S { uint static; };",
    ] {
        let (result, _) = parse_collecting(source);
        let err = result.err().expect("Expected failure");
        assert_eq!(err.kind, ErrorKind::ReservedKeyword, "source: {}", source);
    }
}

#[test]
fn test_variable_alias_shares_value() {
    let module = parse("test.fx", "uint x = 4; uint y = x;", None).expect("Parsing failed");
    let ast = module.ast();

    let x = ast.declarations[module.find_variable("x").unwrap()].value;
    let y = ast.declarations[module.find_variable("y").unwrap()].value;
    assert!(x.is_some());
    assert_eq!(x, y);
}

#[test]
fn test_invalid_member_lists_members() {
    let (result, _) = parse_collecting("struct P { uint a; float b; }; P p = { .missing = 1 };");
    let err = result.err().expect("Expected failure");

    assert_eq!(err.kind, ErrorKind::InvalidMember);
    assert_eq!(
        err.message,
        "'missing': Invalid member. Valid values are:\n - a\n - b\n"
    );
}

#[test]
fn test_unexpected_eof() {
    for source in ["uint x", "struct S { uint a;", "void f() { return;", "SamplerState s = {"] {
        let (result, _) = parse_collecting(source);
        let err = result.err().expect("Expected failure");
        assert_eq!(err.kind, ErrorKind::UnexpectedEof, "source: {}", source);
    }
}

#[test]
fn test_missing_type() {
    let (result, _) = parse_collecting("\nflaot x;");
    let err = result.err().expect("Expected failure");

    assert_eq!(err.kind, ErrorKind::TypeMissing);
    assert_eq!(err.message, "'flaot': type missing");
    assert_eq!(err.user_line(), Some(2));
    assert_eq!(err.location.column, 1);
    assert_eq!(err.line_text, "flaot x;");
    assert!(err.location.line > 2);
}

#[test]
fn test_fn_sink_receives_error_once() {
    let mut seen = Vec::new();
    let mut sink = FnSink(|e: &ParseError| seen.push((e.kind, e.user_line())));
    let result = parse("test.fx", "uint a;\nuint b = c;", Some(&mut sink));

    assert!(result.is_err());
    assert_eq!(seen, vec![(ErrorKind::IdentifierMissing, Some(2))]);
}

#[test]
fn test_without_prelude() {
    let mut parser = ShaderParser::with_config(ParserConfig {
        include_prelude: false,
        ..ParserConfig::default()
    });
    let mut errors: Vec<ParseError> = Vec::new();
    let err = parser
        .parse("test.fx", "SamplerState s;", Some(&mut errors))
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::TypeMissing);
    assert_eq!(err.location.line, 1);
    assert_eq!(err.user_line(), Some(1));
}

#[test]
fn test_custom_enum() {
    let quality: Arc<dyn EnumResolver> = Arc::new(TableEnum::new(&["LOW", "HIGH"]));

    let mut builtins = BuiltinSet::standard();
    builtins.enums.push(("Quality", quality));
    let mut parser = ShaderParser::with_config(ParserConfig {
        include_prelude: false,
        builtins,
    });

    let root = parser
        .parse("test.fx", "Quality q = HIGH;", None)
        .expect("Parsing failed");
    let value = parser.ast().declarations[root.variables[0]].value.unwrap();
    match &parser.ast().values[value] {
        Value::Literal(lit) => {
            assert_eq!(lit.kind, ValueKind::Enum);
            assert_eq!(lit.data, "HIGH");
        }
        other => panic!("Expected enum literal, found {:?}", other),
    }

    let mut errors: Vec<ParseError> = Vec::new();
    let err = parser
        .parse("test.fx", "Quality q = MEDIUM;", Some(&mut errors))
        .unwrap_err();
    assert!(err.message.ends_with(" - LOW\n - HIGH\n"));
}

#[test]
fn test_technique_file() {
    let source = r#"
        struct VSOutput
        {
            float4 position : SV_Position;
            [interpolate(0)] float2 uv : TEXCOORD0;
        };

        Texture2D<float4> albedo;
        SamplerState linear_clamp = {
            .AddressU = CLAMP,
            .AddressV = CLAMP,
            .MinFilter = LINEAR,
            .MagFilter = LINEAR,
            .MaxAnisotropy = 1,
        };

        VSOutput vs_main(uint id : SV_VertexID)
        {
            VSOutput o;
            o.uv = float2((id << 1) & 2, id & 2);
            o.position = float4(o.uv * float2(2, -2) + float2(-1, 1), 0, 1);
            return o;
        }

        float4 ps_main(VSOutput input) : SV_Target
        {
            return albedo.Sample(linear_clamp, input.uv);
        }

        Technique fullscreen = {
            .VertexShader = vs_main,
            .PixelShader = ps_main,
            .RenderState = {
                .DepthEnable = 0,
                .CullMode = NONE,
                .BlendStates = { .Enable = 1, .SrcBlend = SRC_ALPHA, .DestBlend = INV_SRC_ALPHA },
            },
        };
    "#;

    let module = parse("fullscreen.fx", source, None).expect("Parsing failed");
    let ast = module.ast();

    assert_eq!(module.user_structs().count(), 1);
    assert_eq!(module.file().functions.len(), 2);
    assert_eq!(module.file().variables.len(), 3);

    let vs_output = module.find_struct("VSOutput").unwrap();
    let uv = ast.types[ast.structs[vs_output].ty].members[1];
    assert_eq!(ast.declarations[uv].semantic.as_deref(), Some("TEXCOORD0"));
    assert!(ast.has_attribute(&ast.declarations[uv].attributes, "interpolate"));

    let ps = &ast.declarations[module.find_function("ps_main").unwrap()];
    assert_eq!(ps.semantic.as_deref(), Some("SV_Target"));
    assert_eq!(ps.parameters.len(), 1);
    assert!(ps.body.as_deref().unwrap().contains("albedo.Sample"));

    let technique = module.find_variable("fullscreen").unwrap();
    assert_eq!(
        module.technique_stages(technique),
        vec![
            ("VertexShader".to_string(), "vs_main".to_string()),
            ("PixelShader".to_string(), "ps_main".to_string()),
        ]
    );
}
