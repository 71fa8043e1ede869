//! Column names used across the lake layers.

// Raw survey columns.
pub const REGIAO: &str = "Regiao";
pub const ESTADO: &str = "Estado";
pub const MUNICIPIO: &str = "Municipio";
pub const REVENDA: &str = "Revenda";
pub const CNPJ: &str = "CNPJ";
pub const ENDERECO: &str = "Endereco";
pub const PRODUTO: &str = "Produto";
pub const DATA_COLETA: &str = "Data_Coleta";
pub const VALOR_VENDA: &str = "Valor_Venda";
pub const VALOR_COMPRA: &str = "Valor_Compra";
pub const UNIDADE_MEDIDA: &str = "Unidade_Medida";
pub const BANDEIRA: &str = "Bandeira";

/// Columns every raw input file must carry.
pub const REQUIRED_RAW_COLUMNS: [&str; 12] = [
    REGIAO,
    ESTADO,
    MUNICIPIO,
    REVENDA,
    CNPJ,
    ENDERECO,
    PRODUTO,
    DATA_COLETA,
    VALOR_VENDA,
    VALOR_COMPRA,
    UNIDADE_MEDIDA,
    BANDEIRA,
];

/// Format of `Data_Coleta` in raw files.
pub const RAW_DATE_FORMAT: &str = "%d/%m/%Y";

// Bronze technical columns.
pub const BRONZE_LOAD_TIMESTAMP: &str = "bronze_load_timestamp";
pub const BRONZE_SOURCE_FILE: &str = "bronze_source_file";
pub const BRONZE_RECORD_ID: &str = "bronze_record_id";
pub const ANO: &str = "ano";
pub const MES: &str = "mes";

// Clean / normalize outputs.
pub const DATA_COLETA_PARSED: &str = "data_coleta_parsed";
pub const PRODUTO_NORMALIZADO: &str = "produto_normalizado";
pub const REGIAO_NORMALIZADA: &str = "regiao_normalizada";
pub const BANDEIRA_NORMALIZADA: &str = "bandeira_normalizada";
pub const CNPJ_LIMPO: &str = "cnpj_limpo";

// Enrich outputs.
pub const ANO_COLETA: &str = "ano_coleta";
pub const MES_COLETA: &str = "mes_coleta";
pub const TRIMESTRE: &str = "trimestre";
pub const SEMESTRE: &str = "semestre";
pub const DIA_SEMANA: &str = "dia_semana";
pub const NOME_MES: &str = "nome_mes";
pub const MARGEM_ABSOLUTA: &str = "margem_absoluta";
pub const MARGEM_PERCENTUAL: &str = "margem_percentual";
pub const CATEGORIA_PRODUTO: &str = "categoria_produto";
pub const TIPO_BANDEIRA: &str = "tipo_bandeira";
pub const ETANOL_VIAVEL: &str = "etanol_viavel";
pub const FAIXA_PRECO: &str = "faixa_preco";
