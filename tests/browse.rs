//! End to end traversals of modules written with the metadata builder.

use std::path::Path;

use dotbrowse::{
    metadata::{
        builder::MetadataBuilder,
        signatures::{SignatureField, SignatureMethod, TypeSignature},
        tables::TableId,
        typesystem::{FieldAttributes, MethodAttributes, MethodSemanticsAttributes, TypeAttributes},
    },
    prelude::*,
};

fn field_sig(base: TypeSignature) -> SignatureField {
    SignatureField {
        modifiers: vec![],
        base,
    }
}

fn instance(ret: TypeSignature, params: Vec<TypeSignature>) -> SignatureMethod {
    SignatureMethod::new(true, ret, params)
}

/// `namespace N { public class C { public int F; private void M() {} } }`
fn scenario() -> MetadataBuilder {
    let mut builder = MetadataBuilder::new("Scenario.dll");
    builder.assembly("Scenario", [1, 0, 0, 0]);
    let object = builder.type_ref("System", "Object");

    builder.type_def(TypeAttributes::PUBLIC, "N", "C", Some(object));
    builder
        .field(FieldAttributes::PUBLIC, "F", &field_sig(TypeSignature::I4))
        .unwrap();
    builder
        .method(
            MethodAttributes::PRIVATE | MethodAttributes::HIDE_BY_SIG,
            "M",
            &instance(TypeSignature::Void, vec![]),
        )
        .unwrap();
    builder
        .method(
            MethodAttributes::PUBLIC
                | MethodAttributes::SPECIAL_NAME
                | MethodAttributes::RT_SPECIAL_NAME,
            ".ctor",
            &instance(TypeSignature::Void, vec![]),
        )
        .unwrap();

    builder
}

#[test]
fn scenario_from_pe_image() {
    let image = scenario().build_pe().unwrap();
    let module = CilModule::from_mem(image).unwrap();
    assert_eq!(module.runtime_version(), "v4.0.30319");
    assert_eq!(module.assembly().unwrap().name, "Scenario");

    let tree = build_namespace_tree(&module).unwrap();
    assert_eq!(tree.len(), 1);

    let namespace = &tree[0];
    assert_eq!(namespace.name, "N");
    assert_eq!(namespace.full_name, "N");
    assert_eq!(namespace.members.len(), 1);

    let ty = &namespace.members[0];
    assert_eq!(ty.name, "C");
    assert_eq!(ty.full_name, "N.C");
    assert_eq!(ty.access_modifier, "public class ");
    assert_eq!(ty.members.len(), 3);

    let method = ty.find_member("M").unwrap();
    assert_eq!(method.kind, MemberKind::Method);
    assert_eq!(method.full_name, "private  System.Void M ()");
    assert_eq!(method.type_name, "System.Void");
    assert_eq!(method.declaration_info, "()");
    assert_eq!(method.access_modifier, "private ");

    let constructor = ty.members_of(MemberKind::Constructor).next().unwrap();
    assert_eq!(constructor.name, "public  .ctor ()");
    assert_eq!(constructor.full_name, constructor.name);
    assert_eq!(constructor.type_name, "N.C");
    assert_eq!(constructor.access_modifier, "public ");

    let field = ty.find_member("F").unwrap();
    assert_eq!(field.kind, MemberKind::Field);
    assert_eq!(field.full_name, "public System.Int32 F");
    assert_eq!(field.declaration_info, field.full_name);
    assert_eq!(field.type_name, "System.Int32");
}

#[test]
fn generic_instantiation_in_field_type() {
    let mut builder = MetadataBuilder::new("Generic.dll");
    let object = builder.type_ref("System", "Object");
    let list = builder.type_ref("System.Collections.Generic", "List`1");

    builder.type_def(TypeAttributes::PUBLIC, "Data", "Store", Some(object));
    builder
        .field(
            FieldAttributes::PRIVATE | FieldAttributes::INIT_ONLY,
            "names",
            &field_sig(TypeSignature::GenericInst(
                Box::new(TypeSignature::Class(list)),
                vec![TypeSignature::String],
            )),
        )
        .unwrap();

    let module = builder.build_module().unwrap();
    let tree = build_namespace_tree(&module).unwrap();
    let field = tree[0]
        .find_type("Store")
        .unwrap()
        .find_member("names")
        .unwrap();

    assert_eq!(
        field.type_name,
        "System.Collections.Generic.List<System.String>"
    );
    assert_eq!(
        field.full_name,
        "private readonly System.Collections.Generic.List<System.String> names"
    );
    assert_eq!(field.access_modifier, "public class ");
}

#[test]
fn generic_method_names_carry_their_parameters() {
    let mut builder = MetadataBuilder::new("GenericMethod.dll");
    let object = builder.type_ref("System", "Object");

    builder.type_def(TypeAttributes::PUBLIC, "Util", "Convert", Some(object));
    let method = builder
        .method(
            MethodAttributes::PUBLIC | MethodAttributes::STATIC,
            "Cast",
            &SignatureMethod::new(
                false,
                TypeSignature::GenericParamMethod(0),
                vec![TypeSignature::Object],
            ),
        )
        .unwrap();
    builder.generic_param(method, 0, "T");

    let module = builder.build_module().unwrap();
    let tree = build_namespace_tree(&module).unwrap();
    let cast = tree[0]
        .find_type("Convert")
        .unwrap()
        .find_member("Cast")
        .unwrap();

    assert_eq!(cast.access_modifier, "public static ");
    assert_eq!(
        cast.full_name,
        "public static  Util.T Cast<Util.T> (System.Object)"
    );
}

#[test]
fn dangling_type_constraint_aborts_the_traversal() {
    let mut builder = MetadataBuilder::new("Dangling.dll");
    let object = builder.type_ref("System", "Object");

    builder.type_def(TypeAttributes::PUBLIC, "Ok", "Fine", Some(object));
    let broken = builder.type_def(TypeAttributes::PUBLIC, "Bad", "Holder`1", Some(object));
    let param = builder.generic_param(broken, 0, "T");
    builder.generic_param_constraint(param, Token::from_parts(TableId::TypeRef, 99));

    let module = builder.build_module().unwrap();
    match build_namespace_tree(&module) {
        Err(Error::MetadataResolution { context, reason }) => {
            assert_eq!(context, "Bad.Holder`1");
            assert!(reason.contains("generic parameter T"));
        }
        other => panic!("expected a resolution failure, got {other:?}"),
    }
}

#[test]
fn dangling_method_constraint_names_the_method() {
    let mut builder = MetadataBuilder::new("DanglingMethod.dll");
    let object = builder.type_ref("System", "Object");

    builder.type_def(TypeAttributes::PUBLIC, "Ns", "Type", Some(object));
    let method = builder
        .method(
            MethodAttributes::PUBLIC,
            "Method",
            &instance(
                TypeSignature::Void,
                vec![TypeSignature::GenericParamMethod(0)],
            ),
        )
        .unwrap();
    let param = builder.generic_param(method, 0, "U");
    builder.generic_param_constraint(param, Token::from_parts(TableId::TypeRef, 99));

    let module = builder.build_module().unwrap();
    match build_namespace_tree(&module) {
        Err(Error::MetadataResolution { context, .. }) => assert_eq!(context, "Ns.Type::Method"),
        other => panic!("expected a resolution failure, got {other:?}"),
    }
}

#[test]
fn global_types_keep_the_namespace_separator() {
    let mut builder = MetadataBuilder::new("Global.dll");
    let object = builder.type_ref("System", "Object");

    let program = builder.type_def(TypeAttributes::PUBLIC, "", "Program", Some(object));
    builder
        .field(
            FieldAttributes::PUBLIC,
            "Self",
            &field_sig(TypeSignature::Class(program)),
        )
        .unwrap();

    let module = builder.build_module().unwrap();
    let tree = build_namespace_tree(&module).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "<global>");

    let ty = tree[0].find_type("Program").unwrap();
    assert_eq!(ty.full_name, "Program");

    let field = ty.find_member("Self").unwrap();
    assert_eq!(field.type_name, ".Program");
    assert_eq!(field.full_name, "public .Program Self");
}

#[test]
fn nested_type_members_report_the_runtime_type() {
    let mut builder = MetadataBuilder::new("Nesting.dll");
    let object = builder.type_ref("System", "Object");

    let outer = builder.type_def(TypeAttributes::PUBLIC, "N", "Outer", Some(object));
    let inner = builder.type_def(
        TypeAttributes::NESTED_PUBLIC,
        "",
        "Inner",
        Some(object),
    );
    builder.nest(inner, outer);

    let module = builder.build_module().unwrap();
    let tree = build_namespace_tree(&module).unwrap();
    let member = tree[0]
        .find_type("Outer")
        .unwrap()
        .members_of(MemberKind::NestedType)
        .next()
        .unwrap();

    assert_eq!(member.name, "Inner");
    assert_eq!(member.full_name, "N.Outer+Inner");
    assert_eq!(member.type_name, "System.RuntimeType");
    assert_eq!(member.access_modifier, "public class ");
}

#[test]
fn event_without_remove_accessor_aborts_the_traversal() {
    let mut builder = MetadataBuilder::new("HalfEvent.dll");
    let object = builder.type_ref("System", "Object");
    let handler = builder.type_ref("System", "EventHandler");

    builder.type_def(TypeAttributes::PUBLIC, "Ok", "Fine", Some(object));
    builder.type_def(TypeAttributes::PUBLIC, "N", "C", Some(object));
    let add = builder
        .method(
            MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME,
            "add_Changed",
            &instance(TypeSignature::Void, vec![TypeSignature::Class(handler)]),
        )
        .unwrap();
    let changed = builder.event("Changed", handler);
    builder.semantics(MethodSemanticsAttributes::ADD_ON, add, changed);

    let module = builder.build_module().unwrap();
    match build_namespace_tree(&module) {
        Err(Error::MetadataResolution { context, reason }) => {
            assert_eq!(context, "N.C::Changed");
            assert!(reason.contains("remove"));
        }
        other => panic!("expected a resolution failure, got {other:?}"),
    }

    let declared = AssemblyBrowser::new(BrowserConfig::declared_only()).browse(&module);
    assert!(declared.is_err_and(|error| error.is_metadata_resolution()));
}

#[test]
fn load_failures() {
    let missing = CilModule::from_file(Path::new("/nonexistent/Missing.dll"));
    assert!(missing.is_err_and(|error| error.is_module_load()));

    let garbage = CilModule::from_mem(vec![0x4D, 0x5A, 0x00, 0x01, 0x02]);
    assert!(garbage.is_err_and(|error| error.is_module_load()));

    let result = AssemblyBrowser::default().browse_file(Path::new("/nonexistent/Missing.dll"));
    match result {
        Err(Error::ModuleLoad { path, .. }) => {
            assert_eq!(path, Path::new("/nonexistent/Missing.dll"));
        }
        other => panic!("expected a load failure, got {other:?}"),
    }
}

#[test]
fn traversal_is_deterministic() {
    let module = CilModule::from_mem(scenario().build_pe().unwrap()).unwrap();

    let first = build_namespace_tree(&module).unwrap();
    let second = build_namespace_tree(&module).unwrap();
    assert_eq!(first, second);

    let rebuilt = CilModule::from_mem(scenario().build_pe().unwrap()).unwrap();
    assert_eq!(first, build_namespace_tree(&rebuilt).unwrap());
    assert_eq!(module.mvid(), rebuilt.mvid());
}

#[test]
fn declared_only_configuration() {
    let mut builder = MetadataBuilder::new("Hierarchy.dll");
    let object = builder.type_ref("System", "Object");

    let base = builder.type_def(TypeAttributes::PUBLIC, "H", "Base", Some(object));
    builder
        .field(
            FieldAttributes::PUBLIC,
            "Shared",
            &field_sig(TypeSignature::Boolean),
        )
        .unwrap();
    builder.type_def(TypeAttributes::PUBLIC, "H", "Derived", Some(base));
    builder
        .field(FieldAttributes::PUBLIC, "Own", &field_sig(TypeSignature::Boolean))
        .unwrap();

    let module = builder.build_module().unwrap();

    let all = build_namespace_tree(&module).unwrap();
    let derived = all[0].find_type("Derived").unwrap();
    let names: Vec<&str> = derived.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Own", "Shared"]);

    let declared = AssemblyBrowser::new(BrowserConfig::declared_only())
        .browse(&module)
        .unwrap();
    let derived = declared[0].find_type("Derived").unwrap();
    let names: Vec<&str> = derived.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Own"]);
}
