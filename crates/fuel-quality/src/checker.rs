use polars::prelude::DataFrame;

use fuel_model::{ColumnRule, QualityConfig, QualityReport, ValidationRules, columns};

use crate::scoring;

/// Quality checker bound to the configured thresholds and vocabularies.
#[derive(Debug, Clone)]
pub struct QualityChecker<'a> {
    config: &'a QualityConfig,
}

impl<'a> QualityChecker<'a> {
    pub fn new(config: &'a QualityConfig) -> Self {
        Self { config }
    }

    pub fn report<S: AsRef<str>>(
        &self,
        df: &DataFrame,
        rules: Option<&ValidationRules>,
        key_columns: Option<&[S]>,
    ) -> QualityReport {
        scoring::report(df, rules, key_columns)
    }

    /// Whether the report meets the configured minimum score.
    pub fn passes(&self, report: &QualityReport) -> bool {
        report.overall_quality_score >= self.config.min_quality_score
    }

    /// Columns whose null share exceeds the configured maximum.
    pub fn columns_over_null_limit(&self, report: &QualityReport) -> Vec<String> {
        report
            .completeness
            .iter()
            .filter(|(_, score)| 1.0 - **score > self.config.max_null_percentage)
            .map(|(column, _)| column.clone())
            .collect()
    }

    /// Rules for a raw survey table.
    pub fn raw_rules(&self) -> ValidationRules {
        let mut rules = ValidationRules::new();
        let price = ColumnRule::range(self.config.min_preco, self.config.max_preco);
        rules.insert(columns::VALOR_VENDA.to_string(), price.clone());
        rules.insert(columns::VALOR_COMPRA.to_string(), price);
        rules.insert(
            columns::PRODUTO.to_string(),
            ColumnRule::values(self.config.valid_produtos.iter().cloned()),
        );
        rules.insert(
            columns::REGIAO.to_string(),
            ColumnRule::values(self.config.valid_regioes.iter().cloned()),
        );
        rules
    }

    /// Rules for an enriched silver table.
    pub fn silver_rules(&self) -> ValidationRules {
        let mut rules = ValidationRules::new();
        rules.insert(
            columns::PRODUTO_NORMALIZADO.to_string(),
            ColumnRule::values(self.config.valid_produtos.iter().cloned()),
        );
        rules.insert(
            columns::REGIAO_NORMALIZADA.to_string(),
            ColumnRule::values(self.config.valid_regioes.iter().cloned()),
        );
        rules.insert(
            columns::VALOR_VENDA.to_string(),
            ColumnRule::range(self.config.min_preco, self.config.max_preco),
        );
        rules.insert(
            columns::MARGEM_PERCENTUAL.to_string(),
            ColumnRule::range(0.0, 100.0),
        );
        rules
    }

    /// Business keys of a silver row.
    pub fn silver_keys() -> [&'static str; 3] {
        [
            columns::CNPJ_LIMPO,
            columns::DATA_COLETA_PARSED,
            columns::PRODUTO_NORMALIZADO,
        ]
    }
}
