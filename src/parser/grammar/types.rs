//! Type references, type arguments and type variables.

use crate::ast::{Identifier, TypeReference, TypeReferencePart, TypeVariable, WildcardKind};
use crate::base::{NodeId, Position};

use crate::parser::core::{PResult, Parser};

const PRIMITIVE_OR_VOID: &[&str] = &[
    "boolean", "char", "byte", "short", "int", "long", "float", "double", "void",
];

impl Parser<'_> {
    /// type = nonArrayType ('[' ']')*
    pub(crate) fn type_reference(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let reference = self.non_array_type()?;
        let dimensions = self.array_brackets()?;
        if dimensions > 0 {
            TypeReference(reference).set_array_dimensions(&mut self.ast, dimensions);
            self.finish_node(reference, start);
        }
        Ok(reference)
    }

    /// ('[' ']')*, counted
    pub(crate) fn array_brackets(&mut self) -> PResult<u32> {
        let pairs = self.zero_or_more(|p| {
            p.punct("[")?;
            p.punct("]")
        })?;
        Ok(u32::try_from(pairs.len()).unwrap_or(u32::MAX))
    }

    /// nonArrayType = primitiveType | referenceType
    pub(crate) fn non_array_type(&mut self) -> PResult<NodeId> {
        self.first_of(&[Self::primitive_type, Self::reference_type])
    }

    /// primitiveType = ('boolean' | 'int' | ... | 'void') lexBreak
    fn primitive_type(&mut self) -> PResult<NodeId> {
        let Some(name) = PRIMITIVE_OR_VOID.iter().copied().find(|n| self.at_keyword(n)) else {
            return Err(self.expected_rule("type"));
        };
        let start = self.start();
        self.pos += name.len();
        let ident = Identifier::of(&mut self.ast, name).id();
        self.ast.set_position(ident, Position::new(start.pos, self.pos));
        self.skip_ws();

        let part = TypeReferencePart::create(&mut self.ast);
        part.identifier().put(&mut self.ast, Some(ident));
        self.finish_node(part.id(), start);
        let reference = TypeReference::create(&mut self.ast);
        reference.parts().push_all(&mut self.ast, [part.id()]);
        Ok(self.finish_node(reference.id(), start))
    }

    /// referenceType = typePart ('.' typePart)*
    fn reference_type(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let parts = self.dotted(Self::type_part)?;
        let reference = TypeReference::create(&mut self.ast);
        reference.parts().push_all(&mut self.ast, parts);
        Ok(self.finish_node(reference.id(), start))
    }

    /// item ('.' item)*
    pub(crate) fn dotted(&mut self, item: fn(&mut Self) -> PResult<NodeId>) -> PResult<Vec<NodeId>> {
        let first = item(self)?;
        let mut out = vec![first];
        out.extend(self.zero_or_more(|p| {
            p.punct(".")?;
            item(p)
        })?);
        Ok(out)
    }

    /// typePart = identifier typeArguments?
    fn type_part(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let name = self.identifier()?;
        let arguments = self.type_arguments()?;
        let part = TypeReferencePart::create(&mut self.ast);
        part.identifier().put(&mut self.ast, Some(name));
        part.type_arguments().push_all(&mut self.ast, arguments);
        Ok(self.finish_node(part.id(), start))
    }

    /// typeArguments = ('<' (typeArgument (',' typeArgument)*)? '>')?
    ///
    /// Never misses; an unmatched `<` is left for the expression grammar.
    pub(crate) fn type_arguments(&mut self) -> PResult<Vec<NodeId>> {
        let arguments = self.optional(|p| {
            p.punct("<")?;
            let arguments = p.optional(|p| p.comma_list(Self::type_argument))?;
            p.punct(">")?;
            Ok(arguments.unwrap_or_default())
        })?;
        Ok(arguments.unwrap_or_default())
    }

    /// typeArgument = type | '?' ('extends' | 'super') type | '?'
    fn type_argument(&mut self) -> PResult<NodeId> {
        self.nested(|p| p.first_of(&[Self::type_reference, Self::bounded_wildcard, Self::unbound_wildcard]))
    }

    fn bounded_wildcard(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("?")?;
        let wildcard = match self.keyword_of(&["extends", "super"])? {
            "extends" => WildcardKind::Extends,
            _ => WildcardKind::Super,
        };
        let reference = self.type_reference()?;
        TypeReference(reference).set_wildcard(&mut self.ast, wildcard);
        Ok(self.finish_node(reference, start))
    }

    fn unbound_wildcard(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("?")?;
        let reference = TypeReference::create(&mut self.ast);
        reference.set_wildcard(&mut self.ast, WildcardKind::Unbound);
        Ok(self.finish_node(reference.id(), start))
    }

    /// typeVariables = ('<' (typeVariable (',' typeVariable)*)? '>')?
    pub(crate) fn type_variables(&mut self) -> PResult<Vec<NodeId>> {
        let variables = self.optional(|p| {
            p.punct("<")?;
            let variables = p.optional(|p| p.comma_list(Self::type_variable))?;
            p.punct(">")?;
            Ok(variables.unwrap_or_default())
        })?;
        Ok(variables.unwrap_or_default())
    }

    /// typeVariable = identifier ('extends' type ('&' type)*)?
    fn type_variable(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let name = self.identifier()?;
        let bounds = self.optional(|p| {
            p.keyword("extends")?;
            let first = p.type_reference()?;
            let mut bounds = vec![first];
            bounds.extend(p.zero_or_more(|p| {
                p.solitary("&")?;
                p.type_reference()
            })?);
            Ok(bounds)
        })?;
        let variable = TypeVariable::create(&mut self.ast);
        variable.name().put(&mut self.ast, Some(name));
        variable.extending().push_all(&mut self.ast, bounds.unwrap_or_default());
        Ok(self.finish_node(variable.id(), start))
    }

    /// Whether a parenthesized type could also be read as an expression, which
    /// decides `(a) + b` between a cast and a sum.
    pub(crate) fn type_is_expression_like(&self, id: NodeId) -> bool {
        let reference = TypeReference(id);
        reference.array_dimensions(&self.ast) == 0
            && reference.wildcard(&self.ast) == WildcardKind::None
            && !reference.is_primitive(&self.ast)
            && !reference.is_void(&self.ast)
            && !reference
                .parts()
                .raw(&self.ast)
                .iter()
                .any(|part| !self.ast.list(*part, 1).is_empty())
    }
}
