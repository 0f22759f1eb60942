use std::ops::RangeInclusive;

// --- Colunas obrigatórias da planilha ---

/// Coluna com a Classificação Contábil (chave de agrupamento).
pub const COLUNA_CLASSIFICACAO: &str = "Classificacao_Contabil";

/// Coluna com o Número de Patrimônio.
pub const COLUNA_PATRIMONIO: &str = "Numero_Patrimonio";

/// Colunas exigidas, na ordem em que são reportadas quando ausentes.
pub const COLUNAS_OBRIGATORIAS: [&str; 2] = [COLUNA_CLASSIFICACAO, COLUNA_PATRIMONIO];

/// Valor substituto para Classificação Contábil em branco.
pub const CLASSIFICACAO_NAO_INFORMADA: &str = "CLASSIFICACAO_NAO_INFORMADA";

/// Largura do Número de Patrimônio após o preenchimento com zeros.
pub const LARGURA_PATRIMONIO: usize = 6;

// --- Limites do tamanho do bloco ---

pub const LIMITE_BLOCO_PADRAO: usize = 400;

/// Faixa aceita pela linha de comando (o núcleo só rejeita zero).
pub const FAIXA_LIMITE_BLOCO: RangeInclusive<usize> = 1..=2000;

/// Nome do arquivo de log gravado ao lado do console.
pub const ARQUIVO_LOG_PADRAO: &str = "patrimonio_log.txt";
