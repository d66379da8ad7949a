//! Localized completion catalogs
//!
//! A catalog is built from a static per-(language, locale) table and is a pure
//! function of that pair, so built catalogs are memoized process-wide. Locale
//! switches in the editor hit the memo; nothing is rebuilt per keystroke.

use std::sync::Arc;

use dashmap::DashMap;
use lsp_types::{CompletionItemKind, Documentation, InsertTextFormat, MarkupContent, MarkupKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::language::{Language, Locale};
use crate::metrics::metrics;

use super::labels::{build_info, labels};
use super::snippet::Snippet;

const WPL_ZH_CN: &str = include_str!("../../data/completion/wpl.zh-CN.json");
const WPL_EN_US: &str = include_str!("../../data/completion/wpl.en-US.json");
const OML_ZH_CN: &str = include_str!("../../data/completion/oml.zh-CN.json");
const OML_EN_US: &str = include_str!("../../data/completion/oml.en-US.json");

const PACKAGE_SNIPPET: &str = "package /${path}/ {\n  ${rules}\n}";
const RULE_SNIPPET: &str = "rule ${name} {(\n  ${fields}\n)}";

/// One record of an external completion table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub insert_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Keyword,
    Type,
    Function,
    Variable,
    Constant,
    Text,
}

impl CompletionKind {
    /// Parse a table `kind` tag; unrecognised tags become `Text`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "keyword" => CompletionKind::Keyword,
            "type" | "typeName" => CompletionKind::Type,
            "function" => CompletionKind::Function,
            "variable" | "variableName" => CompletionKind::Variable,
            "constant" | "atom" => CompletionKind::Constant,
            _ => CompletionKind::Text,
        }
    }

    pub fn to_lsp(&self) -> CompletionItemKind {
        match self {
            CompletionKind::Keyword => CompletionItemKind::KEYWORD,
            CompletionKind::Type => CompletionItemKind::TYPE_PARAMETER,
            CompletionKind::Function => CompletionItemKind::FUNCTION,
            CompletionKind::Variable => CompletionItemKind::VARIABLE,
            CompletionKind::Constant => CompletionItemKind::CONSTANT,
            CompletionKind::Text => CompletionItemKind::TEXT,
        }
    }

    /// Kind of entries that carry no `kind` tag.
    pub fn default_for(language: Language) -> Self {
        match language {
            Language::Oml => CompletionKind::Function,
            Language::Wpl => CompletionKind::Text,
        }
    }
}

/// An immutable, insertable suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    /// Snippet template, possibly with `${…}` placeholders.
    pub insert_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl CompletionItem {
    pub fn snippet(&self) -> Snippet {
        Snippet::parse(&self.insert_text)
    }

    /// Convert to an LSP completion item; `sort_order` keeps catalog order in clients.
    pub fn to_lsp(&self, sort_order: usize) -> lsp_types::CompletionItem {
        let snippet = self.snippet();
        let mut item = lsp_types::CompletionItem {
            label: self.label.clone(),
            kind: Some(self.kind.to_lsp()),
            detail: self.detail.clone(),
            ..Default::default()
        };

        if snippet.has_placeholders() {
            item.insert_text = Some(snippet.to_lsp_snippet());
            item.insert_text_format = Some(InsertTextFormat::SNIPPET);
        } else {
            item.insert_text = Some(self.insert_text.clone());
            item.insert_text_format = Some(InsertTextFormat::PLAIN_TEXT);
        }

        if let Some(ref info) = self.info {
            item.documentation = Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::PlainText,
                value: info.clone(),
            }));
        }

        // Sort text ensures proper ordering (lower numbers first)
        item.sort_text = Some(format!("{:04}", sort_order));

        item
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    language: Language,
    locale: Locale,
    items: Arc<[CompletionItem]>,
}

impl Catalog {
    /// Build a catalog from table entries, prepending the structural WPL snippets.
    pub fn from_entries(language: Language, locale: Locale, entries: Vec<CatalogEntry>) -> Self {
        let labels = labels(locale);
        let default_kind = CompletionKind::default_for(language);

        let mut items = Vec::with_capacity(entries.len() + 2);
        if language == Language::Wpl {
            items.push(structural("package", PACKAGE_SNIPPET, labels.package_detail, labels.package_info));
            items.push(structural("rule", RULE_SNIPPET, labels.rule_detail, labels.rule_info));
        }

        items.extend(entries.into_iter().map(|entry| {
            let info = build_info(labels, entry.description.as_deref(), entry.example.as_deref());
            CompletionItem {
                kind: entry.kind.as_deref().map_or(default_kind, CompletionKind::from_tag),
                label: entry.label,
                insert_text: entry.insert_text,
                detail: entry.description.filter(|d| !d.is_empty()),
                info,
                example: entry.example,
            }
        }));

        Self { language, locale, items: items.into() }
    }

    /// Build a catalog from a JSON table in the external record format.
    pub fn from_json(language: Language, locale: Locale, json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|source| Error::CatalogParse { language, locale, source })?;
        Ok(Self::from_entries(language, locale, entries))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn items(&self) -> &Arc<[CompletionItem]> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&CompletionItem> {
        self.items.iter().find(|item| item.label == label)
    }
}

fn structural(label: &str, template: &str, detail: &str, info: &str) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: CompletionKind::Keyword,
        insert_text: template.to_string(),
        detail: Some(detail.to_string()),
        info: Some(info.to_string()),
        example: None,
    }
}

fn builtin_table(language: Language, locale: Locale) -> &'static str {
    match (language, locale) {
        (Language::Wpl, Locale::ZhCn) => WPL_ZH_CN,
        (Language::Wpl, Locale::EnUs) => WPL_EN_US,
        (Language::Oml, Locale::ZhCn) => OML_ZH_CN,
        (Language::Oml, Locale::EnUs) => OML_EN_US,
    }
}

static CATALOGS: Lazy<DashMap<(Language, Locale), Arc<Catalog>>> = Lazy::new(DashMap::new);

/// The built-in catalog for `(language, locale)`, built on first use and memoized.
pub fn build_catalog(language: Language, locale: Locale) -> Arc<Catalog> {
    if let Some(catalog) = CATALOGS.get(&(language, locale)) {
        metrics().record_catalog_hit();
        return Arc::clone(catalog.value());
    }

    metrics().record_catalog_miss();
    let catalog = CATALOGS.entry((language, locale)).or_insert_with(|| {
        let catalog = Catalog::from_json(language, locale, builtin_table(language, locale))
            .unwrap_or_else(|e| {
                error!("Falling back to an empty catalog: {}", e);
                Catalog::from_entries(language, locale, Vec::new())
            });
        debug!("Built {} catalog for {} ({} items)", language, locale, catalog.len());
        Arc::new(catalog)
    });
    Arc::clone(catalog.value())
}

/// Like [`build_catalog`] for a raw locale tag; unknown tags use the default locale.
pub fn build_catalog_for_tag(language: Language, tag: &str) -> Arc<Catalog> {
    build_catalog(language, Locale::resolve(tag))
}
