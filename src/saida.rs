use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::Command,
};

use crate::{Bloco, PatrimonioError, PatrimonioResult, RE_ESPACOS, RE_SEPARADOR_CAMINHO, Resultado};

/// Limpar a tela.
pub fn clear_screen(clear_screen: bool) -> PatrimonioResult<()> {
    if clear_screen {
        if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/c", "cls"]).status()?;
        } else {
            Command::new("clear").status()?;
        }
    }

    Ok(())
}

/// Exibe a descrição e a versão do programa.
pub fn imprimir_versao_do_programa() {
    let descr = [
        "Este programa agrupa números de patrimônio por Classificação Contábil.",
        "A planilha (CSV, Excel ou ODS) deve conter as colunas com os nomes exatos: Classificacao_Contabil e Numero_Patrimonio.",
        "Os números de patrimônio são formatados com 6 dígitos (zeros à esquerda).",
        "Cada classificação é dividida em blocos com um número limitado de bens,",
        "prontos para copiar ou baixar em arquivos .txt.",
    ];

    for line in &descr {
        println!(" {}", line);
    }

    println!("\n versão: {}\n", env!("CARGO_PKG_VERSION"));
}

/// Exibe os blocos formatados por classificação.
pub fn imprimir_resultado(resultado: &Resultado) {
    println!(" Blocos Formatados por Classificação\n");

    for (classificacao, dados) in resultado.iter() {
        println!(
            " {} ({} itens totais)",
            classificacao.to_uppercase(),
            fmt_milhares(dados.total_itens_classificacao)
        );
        println!(" Total de Blocos: {}\n", dados.blocos.len());

        for bloco in &dados.blocos {
            println!(
                "  {} ({} itens) - ({})",
                bloco.nome_bloco,
                fmt_milhares(bloco.contagem_itens),
                bloco.indice_total
            );
            println!("  {}\n", bloco.string_dados);
        }

        println!(" {}\n", "-".repeat(60));
    }

    println!(
        " Total: {} itens em {} classificações e {} blocos.\n",
        fmt_milhares(resultado.total_itens()),
        fmt_milhares(resultado.len()),
        fmt_milhares(resultado.total_blocos())
    );
}

/// Separador de milhares no padrão brasileiro: `1234567` -> `1.234.567`.
pub fn fmt_milhares(n: usize) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    s.chars().enumerate().for_each(|(i, c)| {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push('.');
        }
        result.push(c);
    });

    result
}

/// Nome do arquivo `.txt` de um bloco: `<classificacao>_<nome_bloco>.txt`,
/// com espaços trocados por `_` e separadores de caminho por `-`.
///
/// ### Exemplo
/// ```
/// use transferencia_patrimonial::nome_do_arquivo;
///
/// assert_eq!(nome_do_arquivo("Bens Móveis", "Bloco 2"), "Bens_Móveis_Bloco_2.txt");
/// ```
pub fn nome_do_arquivo(classificacao: &str, nome_bloco: &str) -> String {
    let nome = format!("{classificacao}_{nome_bloco}");
    let nome = RE_ESPACOS.replace_all(&nome, "_");
    let nome = RE_SEPARADOR_CAMINHO.replace_all(&nome, "-");
    format!("{nome}.txt")
}

/// Grava cada bloco em um arquivo de texto dentro de `diretorio`.
///
/// O diretório é criado se necessário. Retorna os caminhos gravados na ordem
/// das classificações e dos blocos.
///
/// Classificações distintas podem gerar o mesmo nome (`Bens Móveis` e
/// `Bens_Móveis`, `A/B` e `A-B`). Nomes já usados nesta exportação, sem
/// distinguir maiúsculas de minúsculas, recebem o sufixo `-2`, `-3`, ...
/// Arquivos de execuções anteriores no mesmo diretório são sobrescritos.
///
/// Se a gravação falhar no meio, [`PatrimonioError::ExportacaoIncompleta`]
/// informa o arquivo com falha e os arquivos já gravados.
pub fn exportar_blocos(resultado: &Resultado, diretorio: &Path) -> PatrimonioResult<Vec<PathBuf>> {
    fs::create_dir_all(diretorio)?;

    let mut arquivos = Vec::with_capacity(resultado.total_blocos());
    let mut usados: HashSet<String> = HashSet::with_capacity(resultado.total_blocos());

    for (classificacao, dados) in resultado.iter() {
        for bloco in &dados.blocos {
            let nome = nome_sem_colisao(nome_do_arquivo(classificacao, &bloco.nome_bloco), &mut usados);
            let file_path = diretorio.join(nome);

            if let Err(source) = gravar_bloco(&file_path, bloco) {
                return Err(PatrimonioError::ExportacaoIncompleta {
                    source,
                    arquivo: file_path,
                    gravados: arquivos,
                });
            }

            arquivos.push(file_path);
        }
    }

    Ok(arquivos)
}

/// Acrescenta `-2`, `-3`, ... antes de `.txt` até o nome ficar livre.
fn nome_sem_colisao(nome: String, usados: &mut HashSet<String>) -> String {
    if usados.insert(nome.to_lowercase()) {
        return nome;
    }

    let base = nome.strip_suffix(".txt").unwrap_or(&nome);
    let mut sufixo = 2;

    loop {
        let candidato = format!("{base}-{sufixo}.txt");
        if usados.insert(candidato.to_lowercase()) {
            return candidato;
        }
        sufixo += 1;
    }
}

fn gravar_bloco(file_path: &Path, bloco: &Bloco) -> io::Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    write!(writer, "{}", bloco.string_dados)?;

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milhares_com_ponto() {
        assert_eq!(fmt_milhares(0), "0");
        assert_eq!(fmt_milhares(400), "400");
        assert_eq!(fmt_milhares(2000), "2.000");
        assert_eq!(fmt_milhares(1234567), "1.234.567");
    }

    #[test]
    fn nome_do_arquivo_troca_espacos_e_barras() {
        assert_eq!(nome_do_arquivo("A", "Bloco de Itens"), "A_Bloco_de_Itens.txt");
        assert_eq!(
            nome_do_arquivo("Máquinas/Equipamentos", "Bloco 3"),
            "Máquinas-Equipamentos_Bloco_3.txt"
        );
    }

    #[test]
    fn nomes_repetidos_recebem_sufixo() {
        let mut usados = HashSet::new();
        let nomes: Vec<String> = ["A_B.txt", "A_B.txt", "a_b.txt", "A_B-2.txt"]
            .into_iter()
            .map(|nome| nome_sem_colisao(nome.to_string(), &mut usados))
            .collect();

        assert_eq!(nomes, ["A_B.txt", "A_B-2.txt", "a_b-3.txt", "A_B-2-2.txt"]);
    }
}
