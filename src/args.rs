use clap::Parser;
use std::path::PathBuf;

use crate::{
    ARQUIVO_LOG_PADRAO, FAIXA_LIMITE_BLOCO, LIMITE_BLOCO_PADRAO, PatrimonioError,
    PatrimonioResult,
};

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Planilha de patrimônio (CSV, .xlsx, .xls ou .ods).
    ///
    /// Colunas obrigatórias (nomes exatos):
    ///
    /// - `Classificacao_Contabil`
    /// - `Numero_Patrimonio`
    #[arg(short, long, required = true)]
    arquivo: Option<PathBuf>,

    /// Clear screen
    #[arg(short, long, default_value_t = false)]
    clear: bool,

    /// Delimitador de campos do CSV (ignorado para Excel/ODS)
    #[arg(short, long, default_value_t = ',')]
    delimitador: char,

    /// Imprimir o resultado em JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Limite de bens por bloco (máximo de patrimônios por string de pesquisa)
    #[arg(
        short,
        long,
        default_value_t = LIMITE_BLOCO_PADRAO,
        value_parser = parse_limite
    )]
    limite: usize,

    /// Arquivo de log
    #[arg(long, default_value = ARQUIVO_LOG_PADRAO)]
    log: PathBuf,

    /// Não gravar o arquivo de log (apenas console)
    #[arg(long, default_value_t = false)]
    sem_log_arquivo: bool,

    /// Diretório onde gravar um arquivo .txt por bloco
    #[arg(short, long)]
    saida: Option<PathBuf>,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug)]
pub struct Config {
    pub arquivo: PathBuf,
    pub clear: bool,
    pub delimitador: u8,
    pub json: bool,
    pub limite_bloco: usize,
    pub arquivo_log: Option<PathBuf>,
    pub saida: Option<PathBuf>,
    pub verbose: bool,
}

pub fn get_config() -> PatrimonioResult<Config> {
    montar_config(Arguments::parse())
}

fn montar_config(args: Arguments) -> PatrimonioResult<Config> {
    // Como o Clap já exige 'required = true', este erro só ocorreria em casos extremos.
    let arquivo = args
        .arquivo
        .ok_or_else(|| PatrimonioError::Configuracao("arquivo de patrimônio não informado".into()))?;

    let delimitador = u8::try_from(args.delimitador)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            PatrimonioError::Configuracao(format!(
                "delimitador inválido: {:?} (use um caractere ASCII)",
                args.delimitador
            ))
        })?;

    Ok(Config {
        arquivo,
        clear: args.clear,
        delimitador,
        json: args.json,
        limite_bloco: args.limite,
        arquivo_log: (!args.sem_log_arquivo).then_some(args.log),
        saida: args.saida,
        verbose: args.verbose,
    })
}

/// Aceita apenas limites dentro da faixa da linha de comando.
fn parse_limite(valor: &str) -> Result<usize, String> {
    let limite: usize = valor
        .parse()
        .map_err(|_| format!("'{valor}' não é um número inteiro positivo"))?;

    if FAIXA_LIMITE_BLOCO.contains(&limite) {
        Ok(limite)
    } else {
        Err(format!(
            "o limite deve estar entre {} e {}",
            FAIXA_LIMITE_BLOCO.start(),
            FAIXA_LIMITE_BLOCO.end()
        ))
    }
}
