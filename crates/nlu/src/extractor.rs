//! Entity extraction
//!
//! One independent rule per entity kind: regexes for the numeric kinds,
//! keyword tables for the categorical kinds. Every match in the utterance
//! is captured with its position; a kind with no match is simply absent.

use regex::Regex;
use sales_assist_config::ExtractionPatternsConfig;
use sales_assist_core::{EntityKind, EntityValue, ExtractedEntities, ExtractedEntity};

/// Regex/keyword entity extractor
pub struct EntityExtractor {
    percentage: Regex,
    currency_patterns: Vec<CurrencyPattern>,
    timeframe: Regex,
    config: ExtractionPatternsConfig,
}

struct CurrencyPattern {
    regex: Regex,
}

impl EntityExtractor {
    pub fn new(config: ExtractionPatternsConfig) -> Self {
        // The percent sign is required; bare numbers are never percentages.
        let percentage = Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("static percentage pattern");

        let currency_patterns = vec![
            // $1,500.50 / $25k / $1.2m
            CurrencyPattern {
                regex: Regex::new(r"(?i)\$\s*(\d+(?:,\d{3})*(?:\.\d+)?)\s*([km])?")
                    .expect("static currency pattern"),
            },
            // 25k / 1.2m without a currency sign
            CurrencyPattern {
                regex: Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*([km])\b")
                    .expect("static currency pattern"),
            },
            // 1,500 dollars / 1500 usd
            CurrencyPattern {
                regex: Regex::new(r"(?i)\b(\d+(?:,\d{3})*(?:\.\d+)?)\s*(usd|dollars)\b")
                    .expect("static currency pattern"),
            },
        ];

        let timeframe = Regex::new(
            r"(?i)\b(?:by|within|in)\s+(?:the\s+)?(?:next\s+)?(\d+\s*(?:days?|weeks?|months?|quarters?))\b",
        )
        .expect("static timeframe pattern");

        Self {
            percentage,
            currency_patterns,
            timeframe,
            config,
        }
    }

    /// Extract all entities from an utterance
    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let lower = text.to_lowercase();
        let mut found: Vec<ExtractedEntity> = Vec::new();

        self.extract_percentages(text, &mut found);
        self.extract_currency(text, &mut found);
        self.extract_timeframes(text, &lower, &mut found);
        self.extract_keywords(&lower, &mut found);

        // A phrase can hit both a regex and a keyword table; keep one
        // entity per (kind, position).
        found.sort_by_key(|e| (e.kind.as_str(), e.position));
        found.dedup_by_key(|e| (e.kind, e.position));

        let entities = ExtractedEntities::new(found);
        tracing::debug!(count = entities.len(), "Extracted entities");
        entities
    }

    fn extract_percentages(&self, text: &str, out: &mut Vec<ExtractedEntity>) {
        for captures in self.percentage.captures_iter(text) {
            let whole = captures.get(0).expect("match 0 always present");
            if let Some(value) = captures.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) {
                out.push(ExtractedEntity {
                    kind: EntityKind::Percentage,
                    value: EntityValue::Number(value),
                    position: whole.start(),
                    source_text: whole.as_str().to_string(),
                });
            }
        }
    }

    fn extract_currency(&self, text: &str, out: &mut Vec<ExtractedEntity>) {
        for pattern in &self.currency_patterns {
            for captures in pattern.regex.captures_iter(text) {
                let whole = captures.get(0).expect("match 0 always present");
                // Skip if a currency pattern at this position already matched
                if out
                    .iter()
                    .any(|e| e.kind == EntityKind::Currency && e.position == whole.start())
                {
                    continue;
                }
                let raw = match captures.get(1) {
                    Some(m) => m.as_str().replace(',', ""),
                    None => continue,
                };
                let Ok(mut amount) = raw.parse::<f64>() else {
                    continue;
                };
                if let Some(suffix) = captures.get(2) {
                    match suffix.as_str().to_lowercase().as_str() {
                        "k" => amount *= 1_000.0,
                        "m" => amount *= 1_000_000.0,
                        _ => {},
                    }
                }
                out.push(ExtractedEntity {
                    kind: EntityKind::Currency,
                    value: EntityValue::Number(amount),
                    position: whole.start(),
                    source_text: whole.as_str().to_string(),
                });
            }
        }
    }

    fn extract_timeframes(&self, text: &str, lower: &str, out: &mut Vec<ExtractedEntity>) {
        for captures in self.timeframe.captures_iter(text) {
            let whole = captures.get(0).expect("match 0 always present");
            out.push(ExtractedEntity {
                kind: EntityKind::Timeframe,
                value: EntityValue::Text(whole.as_str().to_string()),
                position: whole.start(),
                source_text: whole.as_str().to_string(),
            });
        }
        for keyword in &self.config.timeframe_keywords {
            for (position, matched) in lower.match_indices(keyword.as_str()) {
                out.push(ExtractedEntity {
                    kind: EntityKind::Timeframe,
                    value: EntityValue::Text(matched.to_string()),
                    position,
                    source_text: matched.to_string(),
                });
            }
        }
    }

    fn extract_keywords(&self, lower: &str, out: &mut Vec<ExtractedEntity>) {
        let tables = [
            (EntityKind::Segment, &self.config.segments),
            (EntityKind::DealType, &self.config.deal_types),
            (EntityKind::Region, &self.config.regions),
        ];
        for (kind, groups) in tables {
            for group in groups {
                for keyword in &group.keywords {
                    for (position, _) in lower.match_indices(keyword.as_str()) {
                        out.push(ExtractedEntity {
                            kind,
                            value: EntityValue::Text(group.value.clone()),
                            position,
                            source_text: keyword.clone(),
                        });
                    }
                }
            }
        }
        for keyword in &self.config.urgency_keywords {
            for (position, matched) in lower.match_indices(keyword.as_str()) {
                out.push(ExtractedEntity {
                    kind: EntityKind::Urgency,
                    value: EntityValue::Text(matched.to_string()),
                    position,
                    source_text: matched.to_string(),
                });
            }
        }
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(ExtractionPatternsConfig::default())
    }
}
