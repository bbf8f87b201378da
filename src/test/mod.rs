//! Shared fixture modules for unit tests.
//!
//! Every fixture is built with [`MetadataBuilder`] and loaded back through the regular
//! metadata reader.

use crate::metadata::{
    builder::MetadataBuilder,
    cilmodule::CilModule,
    signatures::{
        SignatureField, SignatureMethod, SignatureProperty, SignatureSzArray, SignatureTypeSpec,
        TypeSignature,
    },
    typesystem::{FieldAttributes, MethodAttributes, MethodSemanticsAttributes, TypeAttributes},
};

pub(crate) fn field_sig(base: TypeSignature) -> SignatureField {
    SignatureField {
        modifiers: vec![],
        base,
    }
}

pub(crate) fn method_sig(ret: TypeSignature, params: Vec<TypeSignature>) -> SignatureMethod {
    SignatureMethod::new(true, ret, params)
}

pub(crate) fn ctor_flags(access: MethodAttributes) -> MethodAttributes {
    access | MethodAttributes::SPECIAL_NAME | MethodAttributes::RT_SPECIAL_NAME
}

/// `namespace N { public class C { public int F; private void M() {} } }`
pub(crate) fn fixture_scenario() -> CilModule {
    let mut builder = MetadataBuilder::new("Scenario.dll");
    builder.assembly("Scenario", [1, 0, 0, 0]);
    let object = builder.type_ref("System", "Object");

    builder.type_def(
        TypeAttributes::PUBLIC | TypeAttributes::BEFORE_FIELD_INIT,
        "N",
        "C",
        Some(object),
    );
    builder
        .field(FieldAttributes::PUBLIC, "F", &field_sig(TypeSignature::I4))
        .unwrap();
    builder
        .method(
            MethodAttributes::PRIVATE | MethodAttributes::HIDE_BY_SIG,
            "M",
            &method_sig(TypeSignature::Void, vec![]),
        )
        .unwrap();
    builder
        .method(
            ctor_flags(MethodAttributes::PUBLIC),
            ".ctor",
            &method_sig(TypeSignature::Void, vec![]),
        )
        .unwrap();

    builder.build_module().unwrap()
}

/// Types spread over namespaces in an order that is not alphabetical
///
/// `Zeta.First`, `Zeta.Second`, `Zeta.Second+Nested`, `Alpha.A`, `Program` (no namespace),
/// `Alpha.Inner.B`
pub(crate) fn fixture_namespaces() -> CilModule {
    let mut builder = MetadataBuilder::new("Namespaces.dll");
    let object = builder.type_ref("System", "Object");

    builder.type_def(TypeAttributes::PUBLIC, "Zeta", "First", Some(object));
    let second = builder.type_def(TypeAttributes::PUBLIC, "Zeta", "Second", Some(object));
    let nested = builder.type_def(
        TypeAttributes::NESTED_PRIVATE | TypeAttributes::SEALED,
        "",
        "Nested",
        Some(object),
    );
    builder.nest(nested, second);
    builder.type_def(TypeAttributes::empty(), "Alpha", "A", Some(object));
    builder.type_def(
        TypeAttributes::ABSTRACT | TypeAttributes::SEALED,
        "",
        "Program",
        Some(object),
    );
    builder.type_def(TypeAttributes::PUBLIC, "Alpha.Inner", "B", Some(object));

    builder.build_module().unwrap()
}

/// A small hierarchy in `Zoo`
///
/// ```text
/// public abstract class Animal {
///     protected int Age; private string secret; public static int Count;
///     public virtual void Speak(); public void Eat(int); private void Sleep();
///     public static Animal Create(); public string Name { get; }
///     public event EventHandler Fed; protected Animal();
/// }
/// public class Dog : Animal { public int Tricks; public override void Speak(); public Dog(); }
/// public class Box<T> { public T[] Items; }
/// public class Kennel : Box<Dog> {}
/// ```
pub(crate) fn fixture_inheritance() -> CilModule {
    let mut builder = MetadataBuilder::new("Zoo.dll");
    let object = builder.type_ref("System", "Object");
    let handler = builder.type_ref("System", "EventHandler");

    let animal = builder.type_def(
        TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT,
        "Zoo",
        "Animal",
        Some(object),
    );
    builder
        .field(FieldAttributes::FAMILY, "Age", &field_sig(TypeSignature::I4))
        .unwrap();
    builder
        .field(FieldAttributes::PRIVATE, "secret", &field_sig(TypeSignature::String))
        .unwrap();
    builder
        .field(
            FieldAttributes::PUBLIC | FieldAttributes::STATIC,
            "Count",
            &field_sig(TypeSignature::I4),
        )
        .unwrap();

    let virtual_flags = MethodAttributes::PUBLIC
        | MethodAttributes::VIRTUAL
        | MethodAttributes::HIDE_BY_SIG;
    builder
        .method(
            virtual_flags | MethodAttributes::NEW_SLOT,
            "Speak",
            &method_sig(TypeSignature::Void, vec![]),
        )
        .unwrap();
    builder
        .method(
            MethodAttributes::PUBLIC,
            "Eat",
            &method_sig(TypeSignature::Void, vec![TypeSignature::I4]),
        )
        .unwrap();
    builder
        .method(
            MethodAttributes::PRIVATE,
            "Sleep",
            &method_sig(TypeSignature::Void, vec![]),
        )
        .unwrap();
    builder
        .method(
            MethodAttributes::PUBLIC | MethodAttributes::STATIC,
            "Create",
            &SignatureMethod::new(false, TypeSignature::Class(animal), vec![]),
        )
        .unwrap();

    let accessor_flags = MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME;
    let get_name = builder
        .method(
            accessor_flags,
            "get_Name",
            &method_sig(TypeSignature::String, vec![]),
        )
        .unwrap();
    let add_fed = builder
        .method(
            accessor_flags,
            "add_Fed",
            &method_sig(TypeSignature::Void, vec![TypeSignature::Class(handler)]),
        )
        .unwrap();
    let remove_fed = builder
        .method(
            accessor_flags,
            "remove_Fed",
            &method_sig(TypeSignature::Void, vec![TypeSignature::Class(handler)]),
        )
        .unwrap();
    builder
        .method(
            ctor_flags(MethodAttributes::FAMILY),
            ".ctor",
            &method_sig(TypeSignature::Void, vec![]),
        )
        .unwrap();

    let name = builder
        .property(
            "Name",
            &SignatureProperty {
                has_this: true,
                modifiers: vec![],
                base: TypeSignature::String,
                params: vec![],
            },
        )
        .unwrap();
    builder.semantics(MethodSemanticsAttributes::GETTER, get_name, name);

    let fed = builder.event("Fed", handler);
    builder.semantics(MethodSemanticsAttributes::ADD_ON, add_fed, fed);
    builder.semantics(MethodSemanticsAttributes::REMOVE_ON, remove_fed, fed);

    let dog = builder.type_def(TypeAttributes::PUBLIC, "Zoo", "Dog", Some(animal));
    builder
        .field(FieldAttributes::PUBLIC, "Tricks", &field_sig(TypeSignature::I4))
        .unwrap();
    builder
        .method(virtual_flags, "Speak", &method_sig(TypeSignature::Void, vec![]))
        .unwrap();
    builder
        .method(
            ctor_flags(MethodAttributes::PUBLIC),
            ".ctor",
            &method_sig(TypeSignature::Void, vec![]),
        )
        .unwrap();

    let boxed = builder.type_def(TypeAttributes::PUBLIC, "Zoo", "Box`1", Some(object));
    builder.generic_param(boxed, 0, "T");
    builder
        .field(
            FieldAttributes::PUBLIC,
            "Items",
            &field_sig(TypeSignature::SzArray(SignatureSzArray {
                modifiers: vec![],
                base: Box::new(TypeSignature::GenericParamType(0)),
            })),
        )
        .unwrap();

    let box_of_dog = builder
        .type_spec(&SignatureTypeSpec {
            base: TypeSignature::GenericInst(
                Box::new(TypeSignature::Class(boxed)),
                vec![TypeSignature::Class(dog)],
            ),
        })
        .unwrap();
    builder.type_def(TypeAttributes::PUBLIC, "Zoo", "Kennel", Some(box_of_dog));

    builder.build_module().unwrap()
}
