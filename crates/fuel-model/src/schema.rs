use serde::{Deserialize, Serialize};

use crate::columns;

/// Logical column type, independent of the dataframe dtype backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    String,
    Float,
    Date,
    Integer,
    Category,
    Boolean,
}

impl LogicalType {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalType::String => "string",
            LogicalType::Float => "float",
            LogicalType::Date => "date",
            LogicalType::Integer => "integer",
            LogicalType::Category => "category",
            LogicalType::Boolean => "boolean",
        }
    }
}

/// Declared logical type of a known lake column, if any.
pub fn logical_type(column: &str) -> Option<LogicalType> {
    let kind = match column {
        columns::VALOR_VENDA
        | columns::VALOR_COMPRA
        | columns::MARGEM_ABSOLUTA
        | columns::MARGEM_PERCENTUAL => LogicalType::Float,
        columns::DATA_COLETA_PARSED => LogicalType::Date,
        columns::ANO
        | columns::MES
        | columns::ANO_COLETA
        | columns::MES_COLETA
        | columns::TRIMESTRE
        | columns::SEMESTRE
        | columns::DIA_SEMANA
        | columns::BRONZE_RECORD_ID => LogicalType::Integer,
        columns::PRODUTO_NORMALIZADO
        | columns::REGIAO_NORMALIZADA
        | columns::BANDEIRA_NORMALIZADA
        | columns::CATEGORIA_PRODUTO
        | columns::TIPO_BANDEIRA
        | columns::FAIXA_PRECO
        | columns::NOME_MES => LogicalType::Category,
        columns::ETANOL_VIAVEL => LogicalType::Boolean,
        columns::REGIAO
        | columns::ESTADO
        | columns::MUNICIPIO
        | columns::REVENDA
        | columns::CNPJ
        | columns::ENDERECO
        | columns::PRODUTO
        | columns::DATA_COLETA
        | columns::UNIDADE_MEDIDA
        | columns::BANDEIRA
        | columns::CNPJ_LIMPO
        | columns::BRONZE_LOAD_TIMESTAMP
        | columns::BRONZE_SOURCE_FILE => LogicalType::String,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_columns_have_types() {
        assert_eq!(logical_type("Valor_Venda"), Some(LogicalType::Float));
        assert_eq!(logical_type("data_coleta_parsed"), Some(LogicalType::Date));
        assert_eq!(logical_type("etanol_viavel"), Some(LogicalType::Boolean));
        assert_eq!(logical_type("unknown"), None);
    }
}
