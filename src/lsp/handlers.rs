use std::borrow::Cow;

use tower_lsp::jsonrpc::{Error as LspError, ErrorCode, Result as LspResult};
use tower_lsp::lsp_types::*;

use crate::export;
use crate::lsp::backend::Backend;
use crate::parser::{self, Element, ElementKind, TextPosition};
use crate::validation::rules::{self, RequiredAttribute, ViolationKind};
use crate::validation::{validate_document_with, Finding, FindingKind};

/// Command that saves the open buffer as `validated.svg` beside its file
pub const SAVE_COMMAND: &str = "svgData.saveValidated";

/// Diagnostic source shown by editors
pub const DIAGNOSTIC_SOURCE: &str = "svg-data";

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling completion requests
#[tower_lsp::async_trait]
pub trait HandleCompletion {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>>;
}

/// Trait for handling document symbols
#[tower_lsp::async_trait]
pub trait HandleDocumentSymbol {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
}

/// Trait for handling workspace commands
#[tower_lsp::async_trait]
pub trait HandleExecuteCommand {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<serde_json::Value>>;
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-'
}

/// UTF-16 length of the first `char_count` characters of `line`
pub fn utf16_column(line: &str, char_count: usize) -> u32 {
    line.chars().take(char_count).map(|c| c.len_utf16() as u32).sum()
}

/// Character index of a UTF-16 offset into `line`, clamped to its length
pub fn char_index(line: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (idx, c) in line.chars().enumerate() {
        if units >= utf16_offset {
            return idx;
        }
        units += c.len_utf16();
    }
    line.chars().count()
}

/// Word under the cursor, made of alphanumerics and dashes.
///
/// `utf16_offset` is an LSP `character` value.
pub fn word_at(line: &str, utf16_offset: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let char_idx = char_index(line, utf16_offset);

    let mut start = char_idx;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = char_idx;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    (start < end).then(|| chars[start..end].iter().collect())
}

/// Word fragment immediately before the cursor
pub fn prefix_at(line: &str, utf16_offset: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let end = char_index(line, utf16_offset);
    let mut start = end;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    chars[start..end].iter().collect()
}

/// Markdown shown when hovering a required attribute or a graphic tag
pub fn hover_text(word: &str) -> Option<String> {
    if let Some(attr) = RequiredAttribute::from_name(word) {
        let tags: Vec<_> = ElementKind::ALL
            .iter()
            .map(|kind| format!("`{}`", kind))
            .collect();
        return Some(format!(
            "**{}**\n\n{}\n\nRequired on {}.",
            attr.name(),
            attr.description(),
            tags.join(", ")
        ));
    }

    let kind = ElementKind::from_tag_name(word)?;
    let mut text = format!("**{}**\n\n**Required attributes:**", kind);
    for attr in RequiredAttribute::ALL {
        text.push_str(&format!("\n- `{}`: {}", attr.name(), attr.description()));
    }
    Some(text)
}

/// Parser positions count characters; LSP columns count UTF-16 units
fn lsp_position(content: &str, pos: TextPosition) -> Position {
    let line = pos.line.saturating_sub(1);
    let text = content.lines().nth(line as usize).unwrap_or("");
    let column = pos.column.saturating_sub(1) as usize;
    Position::new(line, utf16_column(text, column))
}

/// Range covering an element's opening tag
fn opening_tag_range(element: &Element, content: &str) -> Range {
    let start = lsp_position(content, element.position);
    let tag_lines: Vec<&str> = element.opening_tag.split('\n').collect();
    let last = tag_lines
        .last()
        .map(|l| l.encode_utf16().count())
        .unwrap_or(0) as u32;

    let end = if tag_lines.len() == 1 {
        Position::new(start.line, start.character + last)
    } else {
        Position::new(start.line + tag_lines.len() as u32 - 1, last)
    };
    Range::new(start, end)
}

/// Convert a finding into an LSP diagnostic
pub fn create_lsp_diagnostic(finding: &Finding, content: &str) -> Diagnostic {
    let range = match (finding.kind, finding.line, finding.position) {
        (FindingKind::ParseError, _, Some(pos)) => {
            let start = lsp_position(content, pos);
            Range::new(start, start)
        }
        (_, Some(line), _) if line > 0 => {
            let idx = line - 1;
            let len = content
                .lines()
                .nth(idx)
                .map(|l| l.encode_utf16().count())
                .unwrap_or(0);
            Range::new(
                Position::new(idx as u32, 0),
                Position::new(idx as u32, len as u32),
            )
        }
        (_, _, Some(pos)) => {
            let start = lsp_position(content, pos);
            Range::new(start, start)
        }
        _ => Range::default(),
    };

    Diagnostic::new(
        range,
        Some(DiagnosticSeverity::ERROR),
        Some(NumberOrString::String(finding.kind.code().to_string())),
        Some(DIAGNOSTIC_SOURCE.to_string()),
        finding.message.clone(),
        None,
        None,
    )
}

/// Document symbol for one graphic element
pub fn element_symbol(element: &Element, content: &str) -> DocumentSymbol {
    let name = match element.id() {
        Some(id) => format!("{} #{}", element.kind, id),
        None => element.kind.to_string(),
    };

    let mut violations = Vec::new();
    rules::check_element(element, &mut violations);
    let missing: Vec<_> = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::Missing)
        .map(|v| v.attribute.name())
        .collect();
    let detail = (!missing.is_empty()).then(|| format!("missing: {}", missing.join(", ")));

    let range = opening_tag_range(element, content);
    let start = range.start;
    let selection_range = Range::new(
        start,
        Position::new(
            start.line,
            start.character + 1 + element.kind.tag_name().len() as u32,
        ),
    );

    DocumentSymbol {
        name,
        detail,
        kind: SymbolKind::OBJECT,
        tags: None,
        #[allow(deprecated)]
        deprecated: Some(false), // Required by tower-lsp 0.20, use tags instead in future versions
        range,
        selection_range,
        children: None,
    }
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;
        let uri = tdpp.text_document.uri;
        let pos = tdpp.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state.content.lines().nth(pos.line as usize).unwrap_or("");
        let Some(word) = word_at(line, pos.character as usize) else {
            return Ok(None);
        };

        Ok(hover_text(&word).map(|value| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: None,
        }))
    }
}

#[tower_lsp::async_trait]
impl HandleCompletion for Backend {
    async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> LspResult<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let line = doc_state.content.lines().nth(pos.line as usize).unwrap_or("");
        let prefix = prefix_at(line, pos.character as usize);

        let completions: Vec<CompletionItem> = RequiredAttribute::ALL
            .into_iter()
            .filter(|attr| attr.name().starts_with(&prefix))
            .map(|attr| CompletionItem {
                label: attr.name().to_string(),
                kind: Some(CompletionItemKind::PROPERTY),
                detail: Some("Required attribute".to_string()),
                documentation: Some(Documentation::String(attr.description().to_string())),
                insert_text: Some(format!("{}=\"$1\"", attr.name())),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                filter_text: Some(attr.name().to_string()),
                ..Default::default()
            })
            .collect();

        if completions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CompletionResponse::Array(completions)))
        }
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Validate a document and publish one diagnostic per finding
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return,
        };

        let result = validate_document_with(&doc_state.content, &self.config.validation_options());
        let diagnostics: Vec<_> = result
            .findings
            .iter()
            .map(|finding| create_lsp_diagnostic(finding, &doc_state.content))
            .collect();
        let version = doc_state.version;
        drop(docs);

        if result.is_clean() {
            self.client
                .log_message(MessageType::INFO, format!("{}: no errors found", uri))
                .await;
        }

        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }
}

#[tower_lsp::async_trait]
impl HandleDocumentSymbol for Backend {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state,
            None => return Ok(None),
        };

        let text = parser::normalize_entities(&doc_state.content);
        let tree = match parser::parse_document(&text) {
            Ok(tree) => tree,
            // Syntax errors are already reported as diagnostics
            Err(_) => return Ok(Some(DocumentSymbolResponse::Nested(Vec::new()))),
        };

        let symbols = tree
            .in_document_order()
            .into_iter()
            .map(|element| element_symbol(element, &text))
            .collect();

        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }
}

#[tower_lsp::async_trait]
impl HandleExecuteCommand for Backend {
    async fn handle_execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> LspResult<Option<serde_json::Value>> {
        if params.command != SAVE_COMMAND {
            return Err(LspError::invalid_params(format!(
                "Unknown command: {}",
                params.command
            )));
        }

        let uri = params
            .arguments
            .first()
            .and_then(|arg| arg.as_str())
            .and_then(|s| Url::parse(s).ok())
            .ok_or_else(|| LspError::invalid_params("Expected a document URI argument"))?;

        let content = {
            let docs = self.documents.lock().await;
            match docs.get(&uri) {
                Some(state) => state.content.clone(),
                None => {
                    return Err(LspError::invalid_params(format!(
                        "Document is not open: {}",
                        uri
                    )));
                }
            }
        };

        let dir = uri
            .to_file_path()
            .ok()
            .and_then(|path| path.parent().map(|p| p.to_path_buf()))
            .ok_or_else(|| LspError::invalid_params(format!("Not a file URI: {}", uri)))?;

        match export::save_document_as(&content, &dir, &self.config.output_file) {
            Ok(path) => {
                self.client
                    .show_message(MessageType::INFO, format!("Saved {}", path.display()))
                    .await;
                Ok(Some(serde_json::Value::String(
                    path.display().to_string(),
                )))
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("Save failed: {:#}", e))
                    .await;
                Err(LspError {
                    code: ErrorCode::InternalError,
                    message: Cow::Owned(e.to_string()),
                    data: None,
                })
            }
        }
    }
}
