//! Signature blob encoders, the inverse of [`super::SignatureParser`].
//!
//! Used by [`crate::metadata::builder::MetadataBuilder`] to produce the `#Blob` entries of
//! synthetic modules.

use crate::{
    file::io::write_compressed_uint,
    metadata::{
        signatures::{
            calling_convention as CC, element_type as ET, SignatureField, SignatureMethod,
            SignatureParameter, SignatureProperty, SignatureTypeSpec, TypeSignature,
        },
        token::Token,
    },
    Result,
};

/// Encode a `MethodDefSig`
///
/// # Errors
/// Returns an error if a token can not be expressed as `TypeDefOrRefOrSpecEncoded`.
pub fn encode_method_signature(signature: &SignatureMethod) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_method(&mut buffer, signature)?;
    Ok(buffer)
}

/// Encode a `FieldSig`
///
/// # Errors
/// Returns an error if a token can not be expressed as `TypeDefOrRefOrSpecEncoded`.
pub fn encode_field_signature(signature: &SignatureField) -> Result<Vec<u8>> {
    let mut buffer = vec![CC::FIELD];
    write_modifiers(&mut buffer, &signature.modifiers)?;
    write_type(&mut buffer, &signature.base)?;
    Ok(buffer)
}

/// Encode a `PropertySig`
///
/// # Errors
/// Returns an error if a token can not be expressed as `TypeDefOrRefOrSpecEncoded`.
pub fn encode_property_signature(signature: &SignatureProperty) -> Result<Vec<u8>> {
    let mut head = CC::PROPERTY;
    if signature.has_this {
        head |= CC::HASTHIS;
    }

    let mut buffer = vec![head];
    write_compressed_uint(&mut buffer, signature.params.len() as u32)?;
    write_modifiers(&mut buffer, &signature.modifiers)?;
    write_type(&mut buffer, &signature.base)?;
    for param in &signature.params {
        write_param(&mut buffer, param)?;
    }

    Ok(buffer)
}

/// Encode a `TypeSpec` blob
///
/// # Errors
/// Returns an error if a token can not be expressed as `TypeDefOrRefOrSpecEncoded`.
pub fn encode_typespec_signature(signature: &SignatureTypeSpec) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_type(&mut buffer, &signature.base)?;
    Ok(buffer)
}

fn write_method(buffer: &mut Vec<u8>, signature: &SignatureMethod) -> Result<()> {
    let mut convention = signature.calling_convention & CC::KIND_MASK;
    if signature.has_this {
        convention |= CC::HASTHIS;
    }
    if signature.explicit_this {
        convention |= CC::EXPLICITTHIS;
    }
    if signature.param_count_generic > 0 {
        convention |= CC::GENERIC;
    }

    buffer.push(convention);
    if signature.param_count_generic > 0 {
        write_compressed_uint(buffer, signature.param_count_generic)?;
    }

    write_compressed_uint(
        buffer,
        (signature.params.len() + signature.varargs.len()) as u32,
    )?;
    write_param(buffer, &signature.return_type)?;
    for param in &signature.params {
        write_param(buffer, param)?;
    }

    if !signature.varargs.is_empty() {
        buffer.push(ET::SENTINEL);
        for param in &signature.varargs {
            write_param(buffer, param)?;
        }
    }

    Ok(())
}

fn write_param(buffer: &mut Vec<u8>, param: &SignatureParameter) -> Result<()> {
    write_modifiers(buffer, &param.modifiers)?;
    if param.by_ref {
        buffer.push(ET::BYREF);
    }

    write_type(buffer, &param.base)
}

fn write_modifiers(buffer: &mut Vec<u8>, modifiers: &[Token]) -> Result<()> {
    for modifier in modifiers {
        buffer.push(ET::CMOD_OPT);
        write_token(buffer, *modifier)?;
    }

    Ok(())
}

fn write_token(buffer: &mut Vec<u8>, token: Token) -> Result<()> {
    let tag = match token.table() {
        0x02 => 0,
        0x01 => 1,
        0x1B => 2,
        _ => {
            return Err(malformed_error!(
                "Token {} is not a TypeDef, TypeRef or TypeSpec",
                token
            ))
        }
    };

    write_compressed_uint(buffer, (token.row() << 2) | tag)
}

fn write_type(buffer: &mut Vec<u8>, signature: &TypeSignature) -> Result<()> {
    if let Some(element_type) = signature.primitive_element_type() {
        buffer.push(element_type);
        return Ok(());
    }

    match signature {
        TypeSignature::Ptr(pointer) => {
            buffer.push(ET::PTR);
            write_modifiers(buffer, &pointer.modifiers)?;
            write_type(buffer, &pointer.base)
        }
        TypeSignature::ByRef(inner) => {
            buffer.push(ET::BYREF);
            write_type(buffer, inner)
        }
        TypeSignature::ValueType(token) => {
            buffer.push(ET::VALUETYPE);
            write_token(buffer, *token)
        }
        TypeSignature::Class(token) => {
            buffer.push(ET::CLASS);
            write_token(buffer, *token)
        }
        TypeSignature::GenericParamType(index) => {
            buffer.push(ET::VAR);
            write_compressed_uint(buffer, *index)
        }
        TypeSignature::GenericParamMethod(index) => {
            buffer.push(ET::MVAR);
            write_compressed_uint(buffer, *index)
        }
        TypeSignature::Array(array) => {
            buffer.push(ET::ARRAY);
            write_type(buffer, &array.base)?;
            write_compressed_uint(buffer, array.rank)?;

            let sizes: Vec<u32> = array.dimensions.iter().map_while(|d| d.size).collect();
            write_compressed_uint(buffer, sizes.len() as u32)?;
            for size in sizes {
                write_compressed_uint(buffer, size)?;
            }

            // Lower bounds are not emitted, no synthetic module needs them
            write_compressed_uint(buffer, 0)
        }
        TypeSignature::GenericInst(base, args) => {
            buffer.push(ET::GENERICINST);
            write_type(buffer, base)?;
            write_compressed_uint(buffer, args.len() as u32)?;
            for arg in args {
                write_type(buffer, arg)?;
            }
            Ok(())
        }
        TypeSignature::FnPtr(method) => {
            buffer.push(ET::FNPTR);
            write_method(buffer, method)
        }
        TypeSignature::SzArray(array) => {
            buffer.push(ET::SZARRAY);
            write_modifiers(buffer, &array.modifiers)?;
            write_type(buffer, &array.base)
        }
        TypeSignature::Pinned(inner) => {
            buffer.push(ET::PINNED);
            write_type(buffer, inner)
        }
        _ => Err(malformed_error!("Can not encode {:?}", signature)),
    }
}
