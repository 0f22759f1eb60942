use execution_time::ExecutionTime;
use std::process;

use transferencia_patrimonial::{
    PatrimonioResult, RegistroTracing, clear_screen, exportar_blocos, get_config,
    imprimir_resultado, imprimir_versao_do_programa, init_logger, ler_planilha,
    processar_patrimonios,
};

fn main() {
    // A forma mais idiomática de reportar erros ao usuário final sem stack trace técnico
    if let Err(err) = run() {
        if err.eh_aviso() {
            tracing::warn!("{err}");
            eprintln!("\n[AVISO]: {err}");
            return;
        }
        tracing::error!("Ação: ERRO CRÍTICO | Detalhe: {err}");
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

fn run() -> PatrimonioResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let config = get_config()?;

    // 2. Setup inicial
    init_logger(config.verbose, config.arquivo_log.as_deref());
    clear_screen(config.clear)?;

    if !config.json {
        imprimir_versao_do_programa();
    }

    tracing::debug!("{:#?}", config);
    tracing::info!(
        "Ação: UPLOAD | Detalhe: Arquivo carregado: {}",
        config.arquivo.display()
    );

    // 3. Leitura da planilha
    let tabela = ler_planilha(&config.arquivo, config.delimitador)?;

    tracing::info!(
        "Arquivo '{}' lido com sucesso. Total de {} itens.",
        config.arquivo.display(),
        tabela.len()
    );

    // 4. Agrupamento e geração dos blocos
    let resultado = processar_patrimonios(&tabela, config.limite_bloco, &RegistroTracing)?;

    // 5. Exibição
    if config.json {
        println!("{}", serde_json::to_string_pretty(&resultado)?);
    } else {
        imprimir_resultado(&resultado);
    }

    // 6. Exportação dos blocos em .txt
    if let Some(diretorio) = &config.saida {
        let arquivos = exportar_blocos(&resultado, diretorio)?;
        tracing::info!(
            "Ação: EXPORTAR | Arquivos: {} | Diretório: {}",
            arquivos.len(),
            diretorio.display()
        );
    }

    if !config.json {
        timer.print_elapsed_time();
    }

    Ok(())
}
