//! Declarations: modifiers and annotations, variables, type bodies, members,
//! type declarations and compilation units.

use crate::ast::{
    Annotation, AnnotationDeclaration, AnnotationElement, AnnotationMethodDeclaration,
    AnnotationValueArray, ClassDeclaration, CompilationUnit, ConstructorDeclaration,
    EmptyDeclaration, EnumConstant, EnumDeclaration, EnumTypeBody, ImportDeclaration,
    InstanceInitializer, InterfaceDeclaration, KeywordModifier, MethodDeclaration, Modifiers,
    NormalTypeBody, PackageDeclaration, StaticInitializer, TypeReference, VariableDeclaration,
    VariableDefinition,
};
use crate::base::constants::MODIFIER_KEYWORDS;
use crate::base::{NodeId, ParseProblem, Position};

use crate::parser::core::{PResult, Parser, Start};

/// The `extends` and `implements` clauses of a type declaration, in the
/// order written.
#[derive(Default)]
struct Supertypes {
    extending: Vec<NodeId>,
    implementing: Vec<NodeId>,
}

impl Parser<'_> {
    // =========================================================================
    // Modifiers and annotations
    // =========================================================================

    /// modifiers = (annotation | keywordModifier)*
    ///
    /// Always yields a node; without modifiers it is zero-width.
    pub(crate) fn modifiers(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let mut annotations = Vec::new();
        let mut keywords = Vec::new();
        loop {
            if let Some(annotation) = self.optional(Self::annotation)? {
                annotations.push(annotation);
            } else if let Some(keyword) = self.optional(Self::keyword_modifier)? {
                keywords.push(keyword);
            } else {
                break;
            }
        }
        let node = Modifiers::create(&mut self.ast);
        node.annotations().push_all(&mut self.ast, annotations);
        node.keywords().push_all(&mut self.ast, keywords);
        Ok(self.finish_node(node.id(), start))
    }

    fn keyword_modifier(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let keyword = self.keyword_of(MODIFIER_KEYWORDS)?;
        let node = KeywordModifier::of(&mut self.ast, keyword);
        Ok(self.finish_node(node.id(), start))
    }

    /// annotation = '@' type ('(' (elements | value)? ')')?
    pub(crate) fn annotation(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("@")?;
        let reference = self.type_reference()?;
        let elements = self.optional(|p| {
            p.punct("(")?;
            p.must(|p| {
                let elements = p.optional(|p| {
                    p.first_of(&[Self::annotation_elements, Self::single_annotation_value])
                })?;
                p.punct(")")?;
                Ok(elements.unwrap_or_default())
            })
        })?;
        let node = Annotation::create(&mut self.ast);
        node.annotation_type_reference().put(&mut self.ast, Some(reference));
        node.elements().push_all(&mut self.ast, elements.unwrap_or_default());
        Ok(self.finish_node(node.id(), start))
    }

    fn annotation_elements(&mut self) -> PResult<Vec<NodeId>> {
        self.comma_list(Self::annotation_element)
    }

    /// annotationElement = identifier '=' annotationValue
    fn annotation_element(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let name = self.identifier()?;
        self.solitary("=")?;
        let value = self.annotation_value()?;
        let node = AnnotationElement::create(&mut self.ast);
        node.name().put(&mut self.ast, Some(name));
        node.value().put(&mut self.ast, Some(value));
        Ok(self.finish_node(node.id(), start))
    }

    /// A lone value is an element without a name.
    fn single_annotation_value(&mut self) -> PResult<Vec<NodeId>> {
        let start = self.start();
        let value = self.annotation_value()?;
        let node = AnnotationElement::create(&mut self.ast);
        node.value().put(&mut self.ast, Some(value));
        Ok(vec![self.finish_node(node.id(), start)])
    }

    /// annotationValue = annotation | '{' values? ','? '}' | ternary
    fn annotation_value(&mut self) -> PResult<NodeId> {
        self.first_of(&[Self::annotation, Self::annotation_value_array, Self::ternary])
    }

    fn annotation_value_array(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("{")?;
        let values = self.must(|p| {
            let values = p.optional(|p| p.comma_list(Self::annotation_value))?;
            p.optional(|p| p.punct(","))?;
            p.punct("}")?;
            Ok(values.unwrap_or_default())
        })?;
        let node = AnnotationValueArray::create(&mut self.ast);
        node.values().push_all(&mut self.ast, values);
        Ok(self.finish_node(node.id(), start))
    }

    // =========================================================================
    // Variables
    // =========================================================================

    /// variableDefinition = type variablePart (',' variablePart)*
    ///
    /// `start` is where the already parsed `modifiers` began.
    pub(crate) fn variable_definition(&mut self, start: Start, modifiers: NodeId) -> PResult<NodeId> {
        let reference = self.type_reference()?;
        let entries = self.comma_list(Self::variable_part)?;
        let node = VariableDefinition::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.type_reference().put(&mut self.ast, Some(reference));
        node.variables().push_all(&mut self.ast, entries);
        Ok(self.finish_node(node.id(), start))
    }

    /// variablePart = identifier dims ('=' (arrayInitializer | expression))?
    fn variable_part(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let name = self.identifier()?;
        let dimensions = self.declarator_dimensions()?;
        let initializer = self.optional(|p| {
            p.solitary("=")?;
            p.first_of(&[Self::array_initializer, Self::expression])
        })?;
        Ok(self.variable_entry_node(start, name, dimensions, initializer))
    }

    /// ('[' ']')* after a declarator, with the `]` enforced.
    fn declarator_dimensions(&mut self) -> PResult<u32> {
        let pairs = self.zero_or_more(|p| {
            p.punct("[")?;
            p.must(|p| p.punct("]"))
        })?;
        Ok(u32::try_from(pairs.len()).unwrap_or(u32::MAX))
    }

    // =========================================================================
    // Type bodies and members
    // =========================================================================

    /// typeBody = '{' member* '}'
    ///
    /// A statement between members is kept as a dangling node of the body.
    pub(crate) fn type_body(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("{")?;
        let (members, strays) = self.recovering_with(Self::member, Some(Self::labelled_statement));
        self.must(|p| p.close_brace())?;
        let node = NormalTypeBody::create(&mut self.ast);
        node.members().push_all(&mut self.ast, members);
        self.dangle(node.id(), strays);
        Ok(self.finish_node(node.id(), start))
    }

    /// member = typeDeclaration | field | method | constructor | initializer | ';'
    pub(crate) fn member(&mut self) -> PResult<NodeId> {
        self.summarize("member declaration", |p| {
            p.first_of(&[
                Self::class_or_interface_declaration,
                Self::enum_declaration,
                Self::annotation_declaration,
                Self::field_declaration,
                Self::method_declaration,
                Self::constructor_declaration,
                Self::static_initializer,
                Self::instance_initializer,
                Self::empty_declaration,
            ])
        })
    }

    /// field = modifiers variableDefinition ';'
    fn field_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let definition = self.variable_definition(start, modifiers)?;
        self.punct(";")?;
        let node = VariableDeclaration::create(&mut self.ast);
        node.definition().put(&mut self.ast, Some(definition));
        Ok(self.finish_node(node.id(), start))
    }

    /// method = modifiers typeVariables type identifier parameters dims throws? (';' | block)
    fn method_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let type_variables = self.type_variables()?;
        let return_type = self.type_reference()?;
        let name = self.identifier()?;
        let parameters = self.parameters()?;
        let dimensions = self.declarator_dimensions()?;
        if dimensions > 0 {
            let reference = TypeReference(return_type);
            let total = reference.array_dimensions(&self.ast).saturating_add(dimensions);
            reference.set_array_dimensions(&mut self.ast, total);
        }
        let thrown = self.throws_clause()?;
        let body = self.optional_body()?;

        let node = MethodDeclaration::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.type_variables().push_all(&mut self.ast, type_variables);
        node.return_type_reference().put(&mut self.ast, Some(return_type));
        node.method_name().put(&mut self.ast, Some(name));
        node.parameters().push_all(&mut self.ast, parameters);
        node.thrown_type_references().push_all(&mut self.ast, thrown);
        node.body().put(&mut self.ast, body);
        Ok(self.finish_node(node.id(), start))
    }

    /// constructor = modifiers typeVariables identifier parameters throws? (';' | block)
    fn constructor_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let type_variables = self.type_variables()?;
        let name = self.identifier()?;
        let parameters = self.parameters()?;
        let thrown = self.throws_clause()?;
        let body = self.optional_body()?;

        let node = ConstructorDeclaration::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.type_variables().push_all(&mut self.ast, type_variables);
        node.type_name().put(&mut self.ast, Some(name));
        node.parameters().push_all(&mut self.ast, parameters);
        node.thrown_type_references().push_all(&mut self.ast, thrown);
        node.body().put(&mut self.ast, body);
        Ok(self.finish_node(node.id(), start))
    }

    /// ';' for no body, or a block.
    fn optional_body(&mut self) -> PResult<Option<NodeId>> {
        match self.optional(|p| p.punct(";"))? {
            Some(_) => Ok(None),
            None => Ok(Some(self.block()?)),
        }
    }

    /// parameters = '(' (parameter (',' parameter)*)? ')'
    fn parameters(&mut self) -> PResult<Vec<NodeId>> {
        self.punct("(")?;
        let parameters = self.optional(|p| p.comma_list(Self::parameter))?;
        self.punct(")")?;
        Ok(parameters.unwrap_or_default())
    }

    /// parameter = modifiers type '...'? identifier dims
    fn parameter(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let reference = self.type_reference()?;
        let varargs = self.optional(|p| p.punct("..."))?.is_some();
        let entry_start = self.start();
        let name = self.identifier()?;
        let dimensions = self.declarator_dimensions()?;
        let entry = self.variable_entry_node(entry_start, name, dimensions, None);

        let node = VariableDefinition::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.type_reference().put(&mut self.ast, Some(reference));
        node.variables().push_all(&mut self.ast, [entry]);
        node.set_varargs(&mut self.ast, varargs);
        Ok(self.finish_node(node.id(), start))
    }

    /// throws = 'throws' type (',' type)*, enforced after the keyword
    fn throws_clause(&mut self) -> PResult<Vec<NodeId>> {
        let thrown = self.optional(|p| {
            p.keyword("throws")?;
            p.must(Self::type_list)
        })?;
        Ok(thrown.unwrap_or_default())
    }

    /// type (',' type)*, enforced after each ','
    fn type_list(&mut self) -> PResult<Vec<NodeId>> {
        let first = self.type_reference()?;
        let mut types = vec![first];
        types.extend(self.zero_or_more(|p| {
            p.punct(",")?;
            p.must(Self::type_reference)
        })?);
        Ok(types)
    }

    fn static_initializer(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("static")?;
        let body = self.block()?;
        let node = StaticInitializer::create(&mut self.ast);
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    fn instance_initializer(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let body = self.block()?;
        let node = InstanceInitializer::create(&mut self.ast);
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    fn empty_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct(";")?;
        let node = EmptyDeclaration::create(&mut self.ast);
        Ok(self.finish_node(node.id(), start))
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    /// typeDeclaration = class | interface | enum | annotationType | ';'
    pub(crate) fn type_declaration(&mut self) -> PResult<NodeId> {
        self.summarize("type declaration", |p| {
            p.first_of(&[
                Self::class_or_interface_declaration,
                Self::enum_declaration,
                Self::annotation_declaration,
                Self::empty_declaration,
            ])
        })
    }

    /// ('extends' typeList | 'implements' typeList)*
    fn supertypes(&mut self) -> PResult<Supertypes> {
        let mut supertypes = Supertypes::default();
        loop {
            if let Some(types) = self.optional(|p| {
                p.keyword("extends")?;
                p.must(Self::type_list)
            })? {
                supertypes.extending.extend(types);
            } else if let Some(types) = self.optional(|p| {
                p.keyword("implements")?;
                p.must(Self::type_list)
            })? {
                supertypes.implementing.extend(types);
            } else {
                return Ok(supertypes);
            }
        }
    }

    /// classOrInterface = modifiers ('class' | 'interface') identifier typeVariables supertypes typeBody
    ///
    /// A class keeps its first `extends` type; an interface keeps all of them
    /// and no `implements` list.
    pub(crate) fn class_or_interface_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let keyword = self.keyword_of(&["class", "interface"])?;
        let name = self.identifier()?;
        let type_variables = self.type_variables()?;
        let supertypes = self.supertypes()?;
        let body = self.type_body()?;

        let id = if keyword == "class" {
            let node = ClassDeclaration::create(&mut self.ast);
            node.modifiers().put(&mut self.ast, Some(modifiers));
            node.name().put(&mut self.ast, Some(name));
            node.type_variables().push_all(&mut self.ast, type_variables);
            node.extending().put(&mut self.ast, supertypes.extending.first().copied());
            node.implementing().push_all(&mut self.ast, supertypes.implementing);
            node.body().put(&mut self.ast, Some(body));
            node.id()
        } else {
            let node = InterfaceDeclaration::create(&mut self.ast);
            node.modifiers().put(&mut self.ast, Some(modifiers));
            node.name().put(&mut self.ast, Some(name));
            node.type_variables().push_all(&mut self.ast, type_variables);
            node.extending().push_all(&mut self.ast, supertypes.extending);
            node.body().put(&mut self.ast, Some(body));
            node.id()
        };
        Ok(self.finish_node(id, start))
    }

    /// enum = modifiers 'enum' identifier supertypes enumBody
    fn enum_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        self.keyword("enum")?;
        let name = self.identifier()?;
        let supertypes = self.supertypes()?;
        let body = self.enum_body()?;
        let node = EnumDeclaration::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.name().put(&mut self.ast, Some(name));
        node.implementing().push_all(&mut self.ast, supertypes.implementing);
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    /// enumBody = '{' (constant (',' constant)*)? ','? (';' member*)? '}', enforced after the '{'
    fn enum_body(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("{")?;
        let (constants, members) = self.must(|p| {
            let constants = p.optional(|p| p.comma_list(Self::enum_constant))?;
            p.optional(|p| p.punct(","))?;
            let members = match p.optional(|p| p.punct(";"))? {
                Some(_) => p.recovering(Self::member),
                None => Vec::new(),
            };
            p.close_brace()?;
            Ok((constants.unwrap_or_default(), members))
        })?;
        let node = EnumTypeBody::create(&mut self.ast);
        node.constants().push_all(&mut self.ast, constants);
        node.members().push_all(&mut self.ast, members);
        Ok(self.finish_node(node.id(), start))
    }

    /// enumConstant = annotation* identifier arguments? typeBody?
    fn enum_constant(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let annotations = self.zero_or_more(Self::annotation)?;
        let name = self.identifier()?;
        let arguments = self.optional(Self::method_arguments)?;
        let body = self.optional(Self::type_body)?;
        let node = EnumConstant::create(&mut self.ast);
        node.annotations().push_all(&mut self.ast, annotations);
        node.name().put(&mut self.ast, Some(name));
        node.arguments().push_all(&mut self.ast, arguments.unwrap_or_default());
        node.body().put(&mut self.ast, body);
        Ok(self.finish_node(node.id(), start))
    }

    /// annotationType = modifiers '@' 'interface' identifier '{' annotationMember* '}'
    fn annotation_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        self.punct("@")?;
        self.keyword("interface")?;
        let name = self.identifier()?;

        let body_start = self.start();
        self.punct("{")?;
        let members = self.recovering(Self::annotation_member);
        self.must(|p| p.close_brace())?;
        let body = NormalTypeBody::create(&mut self.ast);
        body.members().push_all(&mut self.ast, members.into_iter().flatten());
        let body = self.finish_node(body.id(), body_start);

        let node = AnnotationDeclaration::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.name().put(&mut self.ast, Some(name));
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    /// A member of an annotation type body. A lone `;` produces no node.
    fn annotation_member(&mut self) -> PResult<Option<NodeId>> {
        if self.optional(|p| p.punct(";"))?.is_some() {
            return Ok(None);
        }
        let member = self.summarize("member declaration", |p| {
            p.first_of(&[
                Self::annotation_method_declaration,
                Self::field_declaration,
                Self::class_or_interface_declaration,
                Self::enum_declaration,
                Self::annotation_declaration,
            ])
        })?;
        Ok(Some(member))
    }

    /// annotationMethod = modifiers type identifier '(' ')' ('default' annotationValue)? ';'
    fn annotation_method_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let return_type = self.type_reference()?;
        let name = self.identifier()?;
        self.punct("(")?;
        self.punct(")")?;
        let default_value = self.optional(|p| {
            p.keyword("default")?;
            p.must(Self::annotation_value)
        })?;
        self.punct(";")?;
        let node = AnnotationMethodDeclaration::create(&mut self.ast);
        node.modifiers().put(&mut self.ast, Some(modifiers));
        node.return_type_reference().put(&mut self.ast, Some(return_type));
        node.method_name().put(&mut self.ast, Some(name));
        node.default_value().put(&mut self.ast, default_value);
        Ok(self.finish_node(node.id(), start))
    }

    // =========================================================================
    // Compilation units
    // =========================================================================

    /// packageDeclaration = annotation* 'package' identifier ('.' identifier)* ';'
    fn package_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let annotations = self.zero_or_more(Self::annotation)?;
        self.keyword("package")?;
        let parts = self.must(|p| {
            let parts = p.dotted(Self::identifier)?;
            p.punct(";")?;
            Ok(parts)
        })?;
        let node = PackageDeclaration::create(&mut self.ast);
        node.annotations().push_all(&mut self.ast, annotations);
        node.parts().push_all(&mut self.ast, parts);
        Ok(self.finish_node(node.id(), start))
    }

    /// importDeclaration = 'import' 'static'? identifier ('.' identifier)* ('.' '*')? ';'
    fn import_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("import")?;
        let (is_static, parts, is_star) = self.must(|p| {
            let is_static = p.optional(|p| p.keyword("static"))?.is_some();
            let parts = p.dotted(Self::identifier)?;
            let is_star = p
                .optional(|p| {
                    p.punct(".")?;
                    p.punct("*")
                })?
                .is_some();
            p.punct(";")?;
            Ok((is_static, parts, is_star))
        })?;
        let node = ImportDeclaration::create(&mut self.ast);
        node.parts().push_all(&mut self.ast, parts);
        node.set_static_import(&mut self.ast, is_static);
        node.set_star_import(&mut self.ast, is_star);
        Ok(self.finish_node(node.id(), start))
    }

    /// compilationUnit = packageDeclaration? importDeclaration* typeDeclaration*
    ///
    /// Never fails: whatever does not parse is reported and skipped.
    pub(crate) fn compilation_unit(&mut self) -> NodeId {
        let start = self.start();
        self.skip_ws();

        let mark = self.mark();
        self.clear_furthest();
        let package = match self.optional(Self::package_declaration) {
            Ok(package) => package,
            Err(miss) => {
                self.recover(mark, miss);
                None
            }
        };

        let mut imports = Vec::new();
        while self.at_keyword("import") && !self.gave_up() {
            let mark = self.mark();
            self.clear_furthest();
            match self.import_declaration() {
                Ok(import) => imports.push(import),
                Err(miss) => self.recover(mark, miss),
            }
        }

        let types = self.top_level(Self::type_declaration);

        let node = CompilationUnit::create(&mut self.ast);
        node.package_declaration().put(&mut self.ast, package);
        node.import_declarations().push_all(&mut self.ast, imports);
        node.type_declarations().push_all(&mut self.ast, types);
        self.finish_node(node.id(), start)
    }

    /// Members until the end of input, as in a class body.
    pub(crate) fn member_sequence(&mut self) -> Vec<NodeId> {
        self.skip_ws();
        self.top_level(Self::member)
    }

    /// Statements until the end of input, as in a block.
    pub(crate) fn statement_sequence(&mut self) -> Vec<NodeId> {
        self.skip_ws();
        self.top_level(Self::labelled_statement)
    }

    /// One expression spanning the whole input.
    pub(crate) fn whole_expression(&mut self) -> Option<NodeId> {
        self.skip_ws();
        self.clear_furthest();
        let mark = self.mark();
        match self.expression() {
            Ok(expression) => {
                if !self.at_eoi() {
                    let at = self.pos;
                    let problem = ParseProblem::new(
                        Position::new(at, self.text.len()),
                        "Unexpected input after expression",
                    );
                    self.report(problem);
                }
                Some(expression)
            }
            Err(miss) => {
                self.recover(mark, miss);
                None
            }
        }
    }
}
