//! Text dump for debugging.

use crate::parser::arena::Handle;
use crate::parser::ast::*;
use crate::parser::module::ShaderModule;

/// Formats a type reference as written: `const Texture2D<float4>`.
pub fn format_type_ident(ast: &Ast, ident: Handle<TypeIdent>) -> String {
    let ident = &ast.type_idents[ident];
    let mut out = String::new();
    for &m in &ident.base_modifiers {
        out.push_str(&ast.modifiers[m].name);
        out.push(' ');
    }
    out.push_str(&ast.types[ident.base_type].name);

    if let Some(inner) = ident.template_type {
        out.push('<');
        for &m in &ident.template_modifiers {
            out.push_str(&ast.modifiers[m].name);
            out.push(' ');
        }
        out.push_str(&ast.types[inner].name);
        out.push('>');
    }
    out
}

/// Formats an initializer value on one line.
pub fn format_value(ast: &Ast, value: Handle<Value>) -> String {
    match &ast.values[value] {
        Value::Literal(lit) if lit.kind == ValueKind::String => format!("{:?}", lit.data),
        Value::Literal(lit) => lit.data.clone(),
        Value::Member(m) => format!(".{} = {}", m.member, format_value(ast, m.value)),
        Value::Values(values) if values.values.is_empty() => "{}".to_string(),
        Value::Values(values) => {
            let items: Vec<String> = values
                .values
                .iter()
                .map(|&v| format_value(ast, v))
                .collect();
            format!("{{ {} }}", items.join(", "))
        }
    }
}

fn format_attributes(ast: &Ast, attributes: &[Handle<Attribute>]) -> String {
    let mut out = String::new();
    for &a in attributes {
        let attribute = &ast.attributes[a];
        if attribute.parameters.is_empty() {
            out.push_str(&format!("[{}] ", attribute.name));
        } else {
            out.push_str(&format!(
                "[{}({})] ",
                attribute.name,
                attribute.parameters.join(", ")
            ));
        }
    }
    out
}

/// Declaration without its body: storage classes, type, name, parameters,
/// semantic and value.
pub fn format_declaration(ast: &Ast, decl: Handle<Declaration>) -> String {
    let d = &ast.declarations[decl];
    let mut out = format_attributes(ast, &d.attributes);

    for &sc in &d.storage_classes {
        out.push_str(&ast.storage_classes[sc].name);
        out.push(' ');
    }
    out.push_str(&format_type_ident(ast, d.type_ident));
    out.push(' ');
    out.push_str(&d.name);

    if d.is_function {
        let params: Vec<String> = d
            .parameters
            .iter()
            .map(|&p| format_declaration(ast, p))
            .collect();
        out.push_str(&format!("({})", params.join(", ")));
    }
    if let Some(semantic) = &d.semantic {
        out.push_str(&format!(" : {}", semantic));
    }
    if let Some(value) = d.value {
        out.push_str(&format!(" = {}", format_value(ast, value)));
    }
    out
}

pub fn dump_module(module: &ShaderModule) -> String {
    let ast = module.ast();
    let file = module.file();
    let mut out = String::new();

    // Structs
    out.push_str("Structs:\n");
    for &s in &file.structs {
        let node = &ast.structs[s];
        out.push_str(&format!(
            "  {s:?} {}struct {}\n",
            format_attributes(ast, &node.attributes),
            node.name
        ));
        for &member in &ast.types[node.ty].members {
            out.push_str(&format!("    {};\n", format_declaration(ast, member)));
        }
    }

    if !file.functions.is_empty() {
        out.push_str("\nFunctions:\n");
        for &f in &file.functions {
            let body = match &ast.declarations[f].body {
                Some(body) => format!("{{ {} bytes }}", body.len()),
                None => ";".to_string(),
            };
            out.push_str(&format!("  {f:?} {} {}\n", format_declaration(ast, f), body));
        }
    }

    if !file.variables.is_empty() {
        out.push_str("\nVariables:\n");
        for &v in &file.variables {
            out.push_str(&format!("  {v:?} {};\n", format_declaration(ast, v)));
        }
    }

    out
}
