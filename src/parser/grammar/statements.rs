//! Statement rules.
//!
//! A block parses its statements one by one; a statement that does not parse
//! is reported, skipped up to the next `;` or balanced `{...}`, and the block
//! carries on with what follows.

use crate::ast::{
    AlternateConstructorInvocation, Assert, Block, Break, Case, Catch, Continue, DefaultCase,
    DoWhile, EmptyStatement, ExpressionStatement, For, ForEach, If, LabelledStatement,
    Return, SuperConstructorInvocation, Switch, Synchronized, Throw, Try, VariableDeclaration,
    VariableDefinition, VariableDefinitionEntry, While,
};
use crate::base::NodeId;

use crate::parser::core::{PResult, Parser, Start};

impl Parser<'_> {
    // =========================================================================
    // Blocks
    // =========================================================================

    /// block = '{' blockStatement* '}'
    ///
    /// A member declaration in the middle of a block is kept as a dangling
    /// node of the block.
    pub(crate) fn block(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("{")?;
        let (contents, strays) = self.recovering_with(Self::labelled_statement, Some(Self::member));
        self.close_brace()?;
        let block = Block::create(&mut self.ast);
        block.contents().push_all(&mut self.ast, contents);
        self.dangle(block.id(), strays);
        Ok(self.finish_node(block.id(), start))
    }

    /// labelledStatement = (identifier ':')* statement
    pub(crate) fn labelled_statement(&mut self) -> PResult<NodeId> {
        let labels = self.zero_or_more(|p| {
            let start = p.start();
            let label = p.identifier()?;
            p.punct(":")?;
            Ok((start, label))
        })?;
        let mut statement = self.statement()?;
        for (start, label) in labels.into_iter().rev() {
            let node = LabelledStatement::create(&mut self.ast);
            node.label().put(&mut self.ast, Some(label));
            node.statement().put(&mut self.ast, Some(statement));
            statement = self.finish_node(node.id(), start);
        }
        Ok(statement)
    }

    fn statement(&mut self) -> PResult<NodeId> {
        self.nested(Self::any_statement)
    }

    fn any_statement(&mut self) -> PResult<NodeId> {
        self.summarize("statement", |p| {
            p.first_of(&[
                Self::block,
                Self::class_or_interface_declaration,
                Self::local_variable_declaration,
                Self::empty_statement,
                Self::expression_statement,
                Self::if_statement,
                Self::assert_statement,
                Self::switch_statement,
                Self::case_statement,
                Self::default_statement,
                Self::while_statement,
                Self::do_while_statement,
                Self::basic_for,
                Self::enhanced_for,
                Self::break_statement,
                Self::continue_statement,
                Self::return_statement,
                Self::synchronized_statement,
                Self::throw_statement,
                Self::try_statement,
                Self::alternate_constructor_invocation,
                Self::super_constructor_invocation,
            ])
        })
    }

    // =========================================================================
    // Simple statements
    // =========================================================================

    /// localVariableDeclaration = modifiers variableDefinition ';'
    fn local_variable_declaration(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let definition = self.variable_definition(start, modifiers)?;
        self.punct(";")?;
        let node = VariableDeclaration::create(&mut self.ast);
        node.definition().put(&mut self.ast, Some(definition));
        Ok(self.finish_node(node.id(), start))
    }

    fn empty_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct(";")?;
        let node = EmptyStatement::create(&mut self.ast);
        Ok(self.finish_node(node.id(), start))
    }

    /// expressionStatement = statementExpression ';'
    fn expression_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let expression = self.statement_expression()?;
        self.punct(";")?;
        let node = ExpressionStatement::create(&mut self.ast);
        node.expression().put(&mut self.ast, Some(expression));
        Ok(self.finish_node(node.id(), start))
    }

    /// assert = 'assert' expression (':' expression)? ';'
    fn assert_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("assert")?;
        let assertion = self.expression()?;
        let message = self.optional(|p| {
            p.punct(":")?;
            p.expression()
        })?;
        self.punct(";")?;
        let node = Assert::create(&mut self.ast);
        node.assertion().put(&mut self.ast, Some(assertion));
        node.message().put(&mut self.ast, message);
        Ok(self.finish_node(node.id(), start))
    }

    /// case = 'case' expression ':'
    fn case_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("case")?;
        let condition = self.expression()?;
        self.punct(":")?;
        let node = Case::create(&mut self.ast);
        node.condition().put(&mut self.ast, Some(condition));
        Ok(self.finish_node(node.id(), start))
    }

    fn default_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("default")?;
        self.punct(":")?;
        let node = DefaultCase::create(&mut self.ast);
        Ok(self.finish_node(node.id(), start))
    }

    fn break_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("break")?;
        let label = self.optional(Self::identifier)?;
        self.punct(";")?;
        let node = Break::create(&mut self.ast);
        node.label().put(&mut self.ast, label);
        Ok(self.finish_node(node.id(), start))
    }

    fn continue_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("continue")?;
        let label = self.optional(Self::identifier)?;
        self.punct(";")?;
        let node = Continue::create(&mut self.ast);
        node.label().put(&mut self.ast, label);
        Ok(self.finish_node(node.id(), start))
    }

    fn return_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("return")?;
        let value = self.optional(Self::expression)?;
        self.punct(";")?;
        let node = Return::create(&mut self.ast);
        node.value().put(&mut self.ast, value);
        Ok(self.finish_node(node.id(), start))
    }

    fn throw_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("throw")?;
        let throwable = self.expression()?;
        self.punct(";")?;
        let node = Throw::create(&mut self.ast);
        node.throwable().put(&mut self.ast, Some(throwable));
        Ok(self.finish_node(node.id(), start))
    }

    // =========================================================================
    // Compound statements
    // =========================================================================

    /// '(' expression ')'
    fn condition(&mut self) -> PResult<NodeId> {
        self.punct("(")?;
        let condition = self.expression()?;
        self.punct(")")?;
        Ok(condition)
    }

    /// if = 'if' '(' expression ')' statement ('else' statement)?
    fn if_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("if")?;
        let condition = self.condition()?;
        let statement = self.labelled_statement()?;
        let otherwise = self.optional(|p| {
            p.keyword("else")?;
            p.labelled_statement()
        })?;
        let node = If::create(&mut self.ast);
        node.condition().put(&mut self.ast, Some(condition));
        node.statement().put(&mut self.ast, Some(statement));
        node.else_statement().put(&mut self.ast, otherwise);
        Ok(self.finish_node(node.id(), start))
    }

    /// switch = 'switch' '(' expression ')' block
    fn switch_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("switch")?;
        let condition = self.condition()?;
        let body = self.block()?;
        let node = Switch::create(&mut self.ast);
        node.condition().put(&mut self.ast, Some(condition));
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    fn while_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("while")?;
        let condition = self.condition()?;
        let statement = self.labelled_statement()?;
        let node = While::create(&mut self.ast);
        node.condition().put(&mut self.ast, Some(condition));
        node.statement().put(&mut self.ast, Some(statement));
        Ok(self.finish_node(node.id(), start))
    }

    /// doWhile = 'do' statement 'while' '(' expression ')' ';'
    fn do_while_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("do")?;
        let statement = self.labelled_statement()?;
        self.keyword("while")?;
        let condition = self.condition()?;
        self.punct(";")?;
        let node = DoWhile::create(&mut self.ast);
        node.statement().put(&mut self.ast, Some(statement));
        node.condition().put(&mut self.ast, Some(condition));
        Ok(self.finish_node(node.id(), start))
    }

    /// basicFor = 'for' '(' forInit? ';' expression? ';' statementExpressions? ')' statement
    fn basic_for(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("for")?;
        self.punct("(")?;
        let definition = self.optional(|p| {
            let start = p.start();
            let modifiers = p.modifiers()?;
            p.variable_definition(start, modifiers)
        })?;
        let inits = match definition {
            Some(_) => Vec::new(),
            None => self
                .optional(|p| p.comma_list(Self::statement_expression))?
                .unwrap_or_default(),
        };
        self.punct(";")?;
        let condition = self.optional(Self::expression)?;
        self.punct(";")?;
        let updates = self
            .optional(|p| p.comma_list(Self::statement_expression))?
            .unwrap_or_default();
        self.punct(")")?;
        let statement = self.labelled_statement()?;

        let node = For::create(&mut self.ast);
        node.variable_declaration().put(&mut self.ast, definition);
        node.expression_inits().push_all(&mut self.ast, inits);
        node.condition().put(&mut self.ast, condition);
        node.updates().push_all(&mut self.ast, updates);
        node.statement().put(&mut self.ast, Some(statement));
        Ok(self.finish_node(node.id(), start))
    }

    /// enhancedFor = 'for' '(' modifiers type identifier dims ':' expression ')' statement
    fn enhanced_for(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("for")?;
        self.punct("(")?;
        let variable = self.single_variable()?;
        self.punct(":")?;
        let iterable = self.expression()?;
        self.punct(")")?;
        let statement = self.labelled_statement()?;

        let node = ForEach::create(&mut self.ast);
        node.variable().put(&mut self.ast, Some(variable));
        node.iterable().put(&mut self.ast, Some(iterable));
        node.statement().put(&mut self.ast, Some(statement));
        Ok(self.finish_node(node.id(), start))
    }

    /// A definition of exactly one variable without an initializer, as in a
    /// catch clause or an enhanced for.
    fn single_variable(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let modifiers = self.modifiers()?;
        let reference = self.type_reference()?;
        let entry_start = self.start();
        let name = self.identifier()?;
        let dimensions = self.array_brackets()?;
        let entry = self.variable_entry_node(entry_start, name, dimensions, None);

        let definition = VariableDefinition::create(&mut self.ast);
        definition.modifiers().put(&mut self.ast, Some(modifiers));
        definition.type_reference().put(&mut self.ast, Some(reference));
        definition.variables().push_all(&mut self.ast, [entry]);
        Ok(self.finish_node(definition.id(), start))
    }

    pub(crate) fn variable_entry_node(
        &mut self,
        start: Start,
        name: NodeId,
        dimensions: u32,
        initializer: Option<NodeId>,
    ) -> NodeId {
        let entry = VariableDefinitionEntry::create(&mut self.ast);
        entry.name().put(&mut self.ast, Some(name));
        entry.initializer().put(&mut self.ast, initializer);
        if dimensions > 0 {
            entry.set_array_dimensions(&mut self.ast, dimensions);
        }
        self.finish_node(entry.id(), start)
    }

    /// synchronized = 'synchronized' '(' expression ')' block
    fn synchronized_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("synchronized")?;
        let lock = self.condition()?;
        let body = self.block()?;
        let node = Synchronized::create(&mut self.ast);
        node.lock().put(&mut self.ast, Some(lock));
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    /// try = 'try' block catch* ('finally' block)?
    fn try_statement(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("try")?;
        let body = self.block()?;
        let catches = self.zero_or_more(Self::catch_clause)?;
        let finally = self.optional(|p| {
            p.keyword("finally")?;
            p.block()
        })?;
        let node = Try::create(&mut self.ast);
        node.body().put(&mut self.ast, Some(body));
        node.catches().push_all(&mut self.ast, catches);
        node.finally().put(&mut self.ast, finally);
        Ok(self.finish_node(node.id(), start))
    }

    /// catch = 'catch' '(' modifiers type identifier ')' block
    fn catch_clause(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("catch")?;
        self.punct("(")?;
        let declaration = self.single_variable()?;
        self.punct(")")?;
        let body = self.block()?;
        let node = Catch::create(&mut self.ast);
        node.exception_declaration().put(&mut self.ast, Some(declaration));
        node.body().put(&mut self.ast, Some(body));
        Ok(self.finish_node(node.id(), start))
    }

    // =========================================================================
    // Explicit constructor calls
    // =========================================================================

    /// alternateConstructorInvocation = typeArguments 'this' arguments ';'
    fn alternate_constructor_invocation(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let type_arguments = self.type_arguments()?;
        self.keyword("this")?;
        let arguments = self.method_arguments()?;
        self.punct(";")?;
        let node = AlternateConstructorInvocation::create(&mut self.ast);
        node.constructor_type_arguments().push_all(&mut self.ast, type_arguments);
        node.arguments().push_all(&mut self.ast, arguments);
        Ok(self.finish_node(node.id(), start))
    }

    /// superConstructorInvocation = (level1 '.')? typeArguments 'super' arguments ';'
    fn super_constructor_invocation(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let qualifier = self.optional(|p| {
            let qualifier = p.level1()?;
            p.punct(".")?;
            Ok(qualifier)
        })?;
        let type_arguments = self.type_arguments()?;
        self.keyword("super")?;
        let arguments = self.method_arguments()?;
        self.punct(";")?;
        let node = SuperConstructorInvocation::create(&mut self.ast);
        node.qualifier().put(&mut self.ast, qualifier);
        node.constructor_type_arguments().push_all(&mut self.ast, type_arguments);
        node.arguments().push_all(&mut self.ast, arguments);
        Ok(self.finish_node(node.id(), start))
    }
}

