//! Recursive-descent parser building a [`ShaderEffect`].
//!
//! Top-level identifiers dispatch on exact keyword text (`effect`, `glsl`,
//! `pass`, `properties`); anything else is skipped. Structural errors are
//! left in the lexer's sticky state and parsing carries on in degraded mode.
//! Only unsupported property defaults abort the parse.

use hfx_core::{
    CodeChunk, HfxError, Pass, PassKind, Property, PropertyData, PropertyKind, Resource,
    ResourceType, Result, Shader, ShaderEffect, ShaderStage, INVALID_INDEX,
    LOCAL_HFX_INCLUDE_FLAG, NO_STAGE_FLAG,
};
use tracing::{debug, trace};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, UnexpectedToken};

/// Result of a parse: the effect plus the first structural error, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub effect: ShaderEffect,
    pub error: Option<UnexpectedToken>,
}

impl ParseOutput {
    /// Turn a structural error into a hard failure.
    pub fn into_strict(self) -> Result<ShaderEffect> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(self.effect),
        }
    }
}

/// Conditional-compilation bookkeeping while scanning one `glsl` block.
#[derive(Debug, Default)]
struct StageConditionals {
    current_stage: Option<ShaderStage>,
    depth: u32,
    stage_depth: [Option<u32>; ShaderStage::COUNT],
}

impl StageConditionals {
    fn include_flag(&self) -> u32 {
        self.current_stage.map_or(NO_STAGE_FLAG, |stage| stage as u32)
    }
}

/// Stages that `#if defined(...)` and `#endif` track, in `#endif` priority
/// order.
const CONDITIONAL_STAGES: [ShaderStage; 3] =
    [ShaderStage::Vertex, ShaderStage::Fragment, ShaderStage::Compute];

pub struct Parser<'src, 'buf> {
    lexer: Lexer<'src, 'buf>,
    effect: ShaderEffect,
}

impl<'src, 'buf> Parser<'src, 'buf> {
    pub fn new(lexer: Lexer<'src, 'buf>) -> Self {
        Self {
            lexer,
            effect: ShaderEffect::default(),
        }
    }

    /// Consume tokens until end of stream.
    pub fn parse(mut self) -> Result<ParseOutput> {
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::Identifier => self.identifier(&token)?,
                TokenKind::EndOfStream => break,
                _ => {}
            }
        }

        debug!(
            effect = %self.effect.name,
            code_chunks = self.effect.code_chunks.len(),
            passes = self.effect.passes.len(),
            properties = self.effect.properties.len(),
            "parsed effect"
        );

        Ok(ParseOutput {
            effect: self.effect,
            error: self.lexer.take_error(),
        })
    }

    fn identifier(&mut self, token: &Token<'src>) -> Result<()> {
        match token.text {
            "effect" => self.declaration_effect(),
            "glsl" => {
                self.declaration_glsl();
                Ok(())
            }
            "pass" => {
                self.declaration_pass();
                Ok(())
            }
            "properties" => self.declaration_properties(),
            _ => Ok(()),
        }
    }

    /// Next identifier before the closing brace of the current block, or
    /// `None` at the brace. Running out of input first is a structural error.
    fn next_in_block(&mut self) -> Option<Token<'src>> {
        loop {
            let token = self.lexer.next_token();
            match token.kind {
                TokenKind::CloseBrace => return None,
                TokenKind::EndOfStream => {
                    self.lexer.report(TokenKind::CloseBrace, &token);
                    return None;
                }
                TokenKind::Identifier => return Some(token),
                _ => {}
            }
        }
    }

    fn declaration_effect(&mut self) -> Result<()> {
        let Ok(name) = self.lexer.expect_token(TokenKind::Identifier) else {
            return Ok(());
        };
        self.effect.name = name.text.to_owned();

        if self.lexer.expect_token(TokenKind::OpenBrace).is_err() {
            return Ok(());
        }

        while let Some(token) = self.next_in_block() {
            self.identifier(&token)?;
        }
        Ok(())
    }

    fn declaration_glsl(&mut self) {
        let Ok(name) = self.lexer.expect_token(TokenKind::Identifier) else {
            return;
        };
        let Ok(open_brace) = self.lexer.expect_token(TokenKind::OpenBrace) else {
            return;
        };

        let mut chunk = CodeChunk {
            name: name.text.to_owned(),
            ..Default::default()
        };
        let mut conditionals = StageConditionals::default();
        let mut open_braces = 1u32;

        let mut token = self.lexer.next_token();
        loop {
            match token.kind {
                TokenKind::OpenBrace => open_braces += 1,
                TokenKind::CloseBrace => open_braces -= 1,
                TokenKind::Hash => {
                    token = self.lexer.next_token();
                    self.directive_identifier(&token, &mut chunk, &mut conditionals);
                }
                TokenKind::Identifier if token.is_keyword("uniform") => {
                    token = self.lexer.next_token();
                    self.uniform_identifier(&token, &mut chunk);
                }
                TokenKind::EndOfStream => {
                    self.lexer.report(TokenKind::CloseBrace, &token);
                    return;
                }
                _ => {}
            }

            if open_braces == 0 {
                break;
            }
            token = self.lexer.next_token();
        }

        // Placeholder tokens from degraded mode sit at the current position,
        // so clamp the start to keep the range ordered.
        let code_start = (open_brace.offset + open_brace.text.len()).min(token.offset);
        chunk.code = self.lexer.source()[code_start..token.offset].to_owned();

        debug!(
            name = %chunk.name,
            includes = chunk.includes.len(),
            resources = chunk.resources.len(),
            "glsl code chunk"
        );
        self.effect.code_chunks.push(chunk);
    }

    fn directive_identifier(
        &mut self,
        token: &Token<'src>,
        chunk: &mut CodeChunk,
        conditionals: &mut StageConditionals,
    ) {
        match token.text {
            "if" => {
                if !self.lexer.next_token().is_keyword("defined") {
                    return;
                }
                let mut stage_token = self.lexer.next_token();
                if stage_token.kind == TokenKind::OpenParen {
                    stage_token = self.lexer.next_token();
                }

                conditionals.depth += 1;
                let stage = match stage_token.text {
                    "VERTEX" => ShaderStage::Vertex,
                    "FRAGMENT" => ShaderStage::Fragment,
                    "COMPUTE" => ShaderStage::Compute,
                    _ => return,
                };
                conditionals.stage_depth[stage as usize] = Some(conditionals.depth);
                conditionals.current_stage = Some(stage);
            }
            "pragma" => {
                let pragma = self.lexer.next_token();
                let flag = match pragma.text {
                    "include" => conditionals.include_flag(),
                    "include_hfx" => conditionals.include_flag() | LOCAL_HFX_INCLUDE_FLAG,
                    _ => return,
                };
                let include = self.lexer.next_token();
                trace!(include = include.text, flag, "include");
                chunk.includes.push(include.text.to_owned());
                chunk.include_flags.push(flag);
            }
            "endif" => {
                let depth = Some(conditionals.depth);
                if let Some(stage) = CONDITIONAL_STAGES
                    .into_iter()
                    .find(|stage| conditionals.stage_depth[*stage as usize] == depth)
                {
                    conditionals.stage_depth[stage as usize] = None;
                    conditionals.current_stage = None;
                }
                conditionals.depth = conditionals.depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn uniform_identifier(&mut self, token: &Token<'src>, chunk: &mut CodeChunk) {
        let kind = match token.text {
            "sampler2D" => ResourceType::Texture,
            "image2D" => ResourceType::TextureRW,
            _ => return,
        };
        let name = self.lexer.next_token();
        chunk.resources.push(Resource {
            kind,
            name: name.text.to_owned(),
        });
    }

    fn declaration_pass(&mut self) {
        let Ok(name) = self.lexer.expect_token(TokenKind::Identifier) else {
            return;
        };
        let mut pass = Pass::new(name.text);

        if self.lexer.expect_token(TokenKind::OpenBrace).is_err() {
            return;
        }

        while let Some(token) = self.next_in_block() {
            self.pass_identifier(&token, &mut pass);
        }

        if pass
            .shaders
            .iter()
            .any(|shader| shader.stage == ShaderStage::Compute)
        {
            pass.kind = PassKind::Compute;
        }

        debug!(name = %pass.name, shaders = pass.shaders.len(), kind = ?pass.kind, "pass");
        self.effect.passes.push(pass);
    }

    fn pass_identifier(&mut self, token: &Token<'src>, pass: &mut Pass) {
        let stage = match token.text {
            "vertex" => ShaderStage::Vertex,
            "fragment" => ShaderStage::Fragment,
            "compute" => ShaderStage::Compute,
            _ => return,
        };
        let mut shader = Shader::new(stage);
        self.declaration_shader_stage(&mut shader, &pass.name);
        pass.shaders.push(shader);
    }

    fn declaration_shader_stage(&mut self, shader: &mut Shader, pass_name: &str) {
        if self.lexer.expect_token(TokenKind::Equals).is_err() {
            return;
        }
        let Ok(name) = self.lexer.expect_token(TokenKind::Identifier) else {
            return;
        };

        match self.effect.find_code_chunk(name.text) {
            Some(index) => shader.code_chunk = index as u32,
            None => {
                debug!(
                    pass = pass_name,
                    stage = %shader.stage,
                    code_chunk = name.text,
                    line = name.line,
                    "unresolved code chunk"
                );
                shader.code_chunk = INVALID_INDEX;
            }
        }
    }

    fn declaration_properties(&mut self) -> Result<()> {
        if self.lexer.expect_token(TokenKind::OpenBrace).is_err() {
            return Ok(());
        }

        while let Some(token) = self.next_in_block() {
            self.declaration_property(&token)?;
        }
        Ok(())
    }

    /// `name("UI label", Type [= default])`
    fn declaration_property(&mut self, name: &Token<'src>) -> Result<()> {
        if self.lexer.expect_token(TokenKind::OpenParen).is_err() {
            return Ok(());
        }
        let Ok(ui_name) = self.lexer.expect_token(TokenKind::String) else {
            return Ok(());
        };
        if self.lexer.expect_token(TokenKind::Comma).is_err() {
            return Ok(());
        }

        let type_token = self.number_and_identifier();
        let kind = PropertyKind::from_type_token(type_token.text);
        let mut property = Property::new(name.text, ui_name.text, kind);

        if kind == PropertyKind::Range {
            self.range_bounds(&mut property)?;
        }

        let checkpoint = self.lexer.checkpoint();
        if self.lexer.equal_token(TokenKind::Equals) {
            self.property_default_value(&mut property)?;
        } else {
            self.lexer.restore(checkpoint);
        }

        debug!(name = %property.name, kind = ?property.kind(), "property");
        self.effect.properties.push(property);

        let _ = self.lexer.expect_token(TokenKind::CloseParen);
        Ok(())
    }

    /// Read a type token, gluing a number to a following identifier (`2D`).
    fn number_and_identifier(&mut self) -> Token<'src> {
        let token = self.lexer.next_token();
        if token.kind != TokenKind::Number {
            return token;
        }

        let checkpoint = self.lexer.checkpoint();
        let suffix = self.lexer.next_token();
        if suffix.kind == TokenKind::Identifier {
            self.lexer.join(&token, &suffix)
        } else {
            self.lexer.restore(checkpoint);
            token
        }
    }

    /// Optional `(min, max)` after a `Range` type.
    fn range_bounds(&mut self, property: &mut Property) -> Result<()> {
        let checkpoint = self.lexer.checkpoint();
        if !self.lexer.equal_token(TokenKind::OpenParen) {
            self.lexer.restore(checkpoint);
            return Ok(());
        }

        let Some(min) = self.expect_number()? else {
            return Ok(());
        };
        if self.lexer.expect_token(TokenKind::Comma).is_err() {
            return Ok(());
        }
        let Some(max) = self.expect_number()? else {
            return Ok(());
        };
        if self.lexer.expect_token(TokenKind::CloseParen).is_err() {
            return Ok(());
        }

        if let PropertyData::Range {
            min: range_min,
            max: range_max,
            ..
        } = &mut property.data
        {
            *range_min = min as f32;
            *range_max = max as f32;
        }
        Ok(())
    }

    fn expect_number(&mut self) -> Result<Option<f64>> {
        let Ok(token) = self.lexer.expect_token(TokenKind::Number) else {
            return Ok(None);
        };
        if self.lexer.has_error() {
            return Ok(None);
        }
        self.literal_value(&token).map(Some)
    }

    fn literal_value(&self, token: &Token<'src>) -> Result<f64> {
        self.lexer
            .last_literal()
            .ok_or(HfxError::LiteralOverflow { line: token.line })
    }

    fn property_default_value(&mut self, property: &mut Property) -> Result<()> {
        let token = self.lexer.next_token();

        match (&mut property.data, token.kind) {
            // Parsed over, not stored yet.
            (PropertyData::Color | PropertyData::Vector, _) => {
                self.skip_value(&token);
                Ok(())
            }
            (PropertyData::Float { default }, TokenKind::Number) => {
                *default = self.literal_value(&token)? as f32;
                Ok(())
            }
            (PropertyData::Int { default }, TokenKind::Number) => {
                *default = self.literal_value(&token)? as i32;
                Ok(())
            }
            (PropertyData::Range { default, .. }, TokenKind::Number) => {
                *default = self.literal_value(&token)? as f32;
                Ok(())
            }
            (_, TokenKind::Number) => Ok(()),
            (PropertyData::Texture { default, .. }, TokenKind::String) => {
                *default = token.text.to_owned();
                Ok(())
            }
            _ => Err(HfxError::UnsupportedDefault {
                property: property.name.clone(),
                text: token.text.to_owned(),
                line: token.line,
            }),
        }
    }

    /// Skip a default value: one token, or a parenthesized group.
    fn skip_value(&mut self, first: &Token<'src>) {
        if first.kind != TokenKind::OpenParen {
            return;
        }
        let mut depth = 1u32;
        while depth > 0 {
            match self.lexer.next_token().kind {
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => depth -= 1,
                TokenKind::EndOfStream => return,
                _ => {}
            }
        }
    }
}
