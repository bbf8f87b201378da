//! Turns decoded signatures into [`CilType`]s.

use crate::{
    metadata::{
        cilmodule::CilModule,
        signatures::{parse_type_spec_signature, SignatureParameter, TypeSignature},
        token::Token,
        typesystem::{well_known, CilType},
    },
    Error::{RecursionLimit, TypeNotFound},
    Result,
};

/// Deepest type nesting followed while resolving, matching the signature decoder
const MAX_RESOLVE_DEPTH: usize = 50;

/// Generic arguments in scope while resolving a signature
///
/// `VAR n` picks `type_args[n]`, `MVAR n` picks `method_args[n]`. For a type definition the
/// arguments are its own generic parameters, for an instantiated base type they are the
/// arguments of the instantiation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericContext<'a> {
    /// Arguments of the declaring type
    pub type_args: &'a [CilType],
    /// Arguments of the method being described
    pub method_args: &'a [CilType],
}

impl<'a> GenericContext<'a> {
    /// Context with the given type and method arguments
    #[must_use]
    pub fn new(type_args: &'a [CilType], method_args: &'a [CilType]) -> Self {
        GenericContext {
            type_args,
            method_args,
        }
    }

    /// Context without any generic arguments
    #[must_use]
    pub fn empty() -> Self {
        GenericContext::default()
    }

    /// The same type arguments, with different method arguments
    #[must_use]
    pub fn with_method_args(self, method_args: &'a [CilType]) -> Self {
        GenericContext {
            type_args: self.type_args,
            method_args,
        }
    }
}

/// Resolves [`TypeSignature`]s against one module
pub(crate) struct TypeResolver<'a> {
    module: &'a CilModule,
    context: GenericContext<'a>,
}

impl<'a> TypeResolver<'a> {
    pub(crate) fn new(module: &'a CilModule, context: GenericContext<'a>) -> Self {
        TypeResolver { module, context }
    }

    /// Resolve a method or property parameter, by-ref parameters become `T&`
    pub(crate) fn resolve_parameter(&self, parameter: &SignatureParameter) -> Result<CilType> {
        let base = self.resolve(&parameter.base)?;
        if parameter.by_ref {
            return Ok(CilType::by_ref(base));
        }

        Ok(base)
    }

    pub(crate) fn resolve(&self, signature: &TypeSignature) -> Result<CilType> {
        self.resolve_at(signature, 0)
    }

    fn resolve_at(&self, signature: &TypeSignature, depth: usize) -> Result<CilType> {
        if depth >= MAX_RESOLVE_DEPTH {
            return Err(RecursionLimit(MAX_RESOLVE_DEPTH));
        }

        if let Some(known) = well_known(signature) {
            return Ok(known);
        }

        match signature {
            TypeSignature::Ptr(pointer) => {
                Ok(CilType::pointer(self.resolve_at(&pointer.base, depth + 1)?))
            }
            TypeSignature::ByRef(inner) => Ok(CilType::by_ref(self.resolve_at(inner, depth + 1)?)),
            TypeSignature::Pinned(inner) => self.resolve_at(inner, depth + 1),
            TypeSignature::SzArray(array) => {
                Ok(CilType::array(self.resolve_at(&array.base, depth + 1)?, 1))
            }
            TypeSignature::Array(array) => Ok(CilType::array(
                self.resolve_at(&array.base, depth + 1)?,
                array.rank,
            )),
            TypeSignature::Class(token) => self.resolve_token(*token, false, depth),
            TypeSignature::ValueType(token) => self.resolve_token(*token, true, depth),
            TypeSignature::GenericParamType(index) => {
                generic_argument(self.context.type_args, *index, "!")
            }
            TypeSignature::GenericParamMethod(index) => {
                generic_argument(self.context.method_args, *index, "!!")
            }
            TypeSignature::GenericInst(base, args) => {
                let base = self.resolve_at(base, depth + 1)?;
                let args = args
                    .iter()
                    .map(|arg| self.resolve_at(arg, depth + 1))
                    .collect::<Result<Vec<_>>>()?;

                Ok(base.with_generic_args(args))
            }
            other => Err(malformed_error!("Unexpected type in signature - {:?}", other)),
        }
    }

    /// Resolve a `TypeDefOrRefOrSpec` token
    pub(crate) fn resolve_type_token(&self, token: Token, value_type: bool) -> Result<CilType> {
        self.resolve_token(token, value_type, 0)
    }

    fn resolve_token(&self, token: Token, value_type: bool, depth: usize) -> Result<CilType> {
        match token.table() {
            0x02 => self.module.type_def(token.row()),
            0x01 => self.module.type_ref(token.row(), value_type),
            0x1B => {
                let spec = self.module.type_spec(token.row())?;
                let signature = parse_type_spec_signature(&spec.signature)?;
                self.resolve_at(&signature.base, depth + 1)
            }
            _ => Err(TypeNotFound(token)),
        }
    }
}

fn generic_argument(args: &[CilType], index: u32, prefix: &str) -> Result<CilType> {
    match args.get(index as usize) {
        Some(arg) => Ok(arg.clone()),
        None => Err(malformed_error!(
            "Generic parameter {}{} is out of range, {} in scope",
            prefix,
            index,
            args.len()
        )),
    }
}
