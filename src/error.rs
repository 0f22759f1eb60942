use std::{io, path::PathBuf};
use thiserror::Error;

use crate::{COLUNA_CLASSIFICACAO, COLUNA_PATRIMONIO};

/// Tipo de retorno conveniente para todo o projeto
pub type PatrimonioResult<T> = Result<T, PatrimonioError>;

#[derive(Error, Debug)]
pub enum PatrimonioError {
    #[error(
        "A planilha deve conter as colunas exatas: '{classificacao}' e '{patrimonio}'.\n\
        Coluna(s) ausente(s): {}",
        .ausentes.join(", "),
        classificacao = COLUNA_CLASSIFICACAO,
        patrimonio = COLUNA_PATRIMONIO
    )]
    ColunasAusentes { ausentes: Vec<String> },

    #[error("Arquivo <{arquivo}> contém colunas repetidas: <{coluna}>")]
    ColunaDuplicada { arquivo: PathBuf, coluna: String },

    #[error("Erro de configuração: {0}")]
    Configuracao(String),

    #[error("Erro no processamento CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("A planilha não contém dados: nenhum bloco foi gerado.")]
    EntradaVazia,

    #[error(
        "Erro CRÍTICO ao formatar a coluna '{coluna}'.\n\
        Registro nº: {registro}\n\
        Valor: {valor:?}\n\
        Detalhe: {detalhe}",
        coluna = COLUNA_PATRIMONIO
    )]
    Formato {
        registro: usize,
        valor: String,
        detalhe: String,
    },

    #[error(
        "Exportação interrompida ao gravar {arquivo:?}: {source}\n\
        Arquivos já gravados: {quantos}",
        quantos = .gravados.len()
    )]
    ExportacaoIncompleta {
        #[source]
        source: io::Error,
        arquivo: PathBuf,
        /// Arquivos gravados antes da falha (permanecem no disco).
        gravados: Vec<PathBuf>,
    },

    #[error(
        "Erro no número de colunas!\n\
        Arquivo: {arquivo:?}\n\
        Linha nº: {linha}\n\
        Esperado: {esperado} colunas\n\
        Encontrado: {encontrado} colunas"
    )]
    ColumnCount {
        arquivo: PathBuf,
        linha: u64,
        esperado: u64,
        encontrado: u64,
    },

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Arquivo de patrimônio não encontrado!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source]
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error(
        "Erro ao ler a planilha Excel/ODS!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    Planilha {
        #[source]
        source: calamine::Error,
        arquivo: PathBuf,
    },

    #[error("Planilha {arquivo:?} não contém nenhuma aba.")]
    PlanilhaSemAbas { arquivo: PathBuf },

    #[error("Erro na serialização JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Erro ao tratar a coluna '{coluna}'.\n\
        Registro nº: {registro}\n\
        Valor: {valor:?}\n\
        Detalhe: {detalhe}",
        coluna = COLUNA_CLASSIFICACAO
    )]
    Limpeza {
        registro: usize,
        valor: String,
        detalhe: String,
    },
}

impl PatrimonioError {
    /// Indica se o erro deve ser exibido como aviso e não como falha.
    ///
    /// Uma planilha sem linhas não impede a execução: apenas não há blocos a exibir.
    pub fn eh_aviso(&self) -> bool {
        matches!(self, PatrimonioError::EntradaVazia)
    }

    /// Converte erros do crate `csv`, destacando colunas em número divergente.
    pub fn from_csv(e: csv::Error, arquivo: PathBuf) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = e.kind()
        {
            return PatrimonioError::ColumnCount {
                arquivo,
                linha: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
                esperado: *expected_len,
                encontrado: *len,
            };
        }
        PatrimonioError::Csv(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apenas_entrada_vazia_eh_aviso() {
        assert!(PatrimonioError::EntradaVazia.eh_aviso());
        assert!(!PatrimonioError::Configuracao("x".into()).eh_aviso());
        assert!(
            !PatrimonioError::ColunasAusentes {
                ausentes: vec![COLUNA_PATRIMONIO.to_string()]
            }
            .eh_aviso()
        );
    }

    #[test]
    fn mensagem_lista_colunas_ausentes() {
        let err = PatrimonioError::ColunasAusentes {
            ausentes: vec![
                COLUNA_CLASSIFICACAO.to_string(),
                COLUNA_PATRIMONIO.to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Coluna(s) ausente(s): Classificacao_Contabil, Numero_Patrimonio"));
    }
}
