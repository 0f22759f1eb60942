use calamine::{Data, Reader, open_workbook_auto};
use std::{collections::HashSet, fs, path::Path};

use crate::{Celula, PatrimonioError, PatrimonioResult, Tabela};

/// Lê a planilha de patrimônio: Excel/ODS (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`)
/// ou, para qualquer outra extensão, CSV com o `delimitador` informado.
pub fn ler_planilha(path: &Path, delimitador: u8) -> PatrimonioResult<Tabela> {
    let extensao = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extensao.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => ler_excel(path),
        _ => ler_csv(path, delimitador),
    }
}

/// Lê a primeira aba de uma planilha Excel/ODS.
///
/// A primeira linha é o cabeçalho. Números viram [`Celula::Numero`] (inteiros
/// são mantidos como texto para não perder dígitos); células vazias ou com
/// erro (`#N/D`, `#VALOR!`) viram [`Celula::Ausente`].
fn ler_excel(path: &Path) -> PatrimonioResult<Tabela> {
    let erro_planilha = |e: calamine::Error| PatrimonioError::Planilha {
        source: e,
        arquivo: path.to_path_buf(),
    };

    let mut workbook = open_workbook_auto(path).map_err(erro_planilha)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PatrimonioError::PlanilhaSemAbas {
            arquivo: path.to_path_buf(),
        })?
        .map_err(erro_planilha)?;

    let mut rows = range.rows();

    let colunas: Vec<String> = rows
        .next()
        .map(|cabecalho| cabecalho.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    verificar_colunas_repetidas(&colunas, path)?;

    let linhas = rows
        .map(|row| row.iter().map(celula_do_excel).collect())
        .collect();

    Ok(Tabela { colunas, linhas })
}

fn celula_do_excel(dado: &Data) -> Celula {
    match dado {
        Data::Empty | Data::Error(_) => Celula::Ausente,
        Data::Int(inteiro) => Celula::from(*inteiro),
        Data::Float(numero) => Celula::numero(*numero),
        Data::String(texto) => Celula::texto(texto.trim()),
        outro => Celula::texto(outro.to_string()),
    }
}

/// Colunas repetidas tornam ambígua a escolha da coluna.
fn verificar_colunas_repetidas(colunas: &[String], path: &Path) -> PatrimonioResult<()> {
    let mut vista = HashSet::with_capacity(colunas.len());
    match colunas.iter().find(|&col| !vista.insert(col)) {
        Some(repetida) => Err(PatrimonioError::ColunaDuplicada {
            arquivo: path.to_path_buf(),
            coluna: repetida.clone(),
        }),
        None => Ok(()),
    }
}

/// Lê a planilha em formato CSV.
///
/// O conteúdo é decodificado como UTF-8; se não for válido, é lido como Latin-1
/// (planilhas exportadas pelo Excel em português costumam vir assim).
/// Células em branco viram [`Celula::Ausente`]; as demais, [`Celula::Texto`].
fn ler_csv(path: &Path, delimitador: u8) -> PatrimonioResult<Tabela> {
    let bytes = fs::read(path).map_err(|e| PatrimonioError::IoReader {
        source: e,
        arquivo: path.to_path_buf(),
    })?;

    let conteudo = decodificar(bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimitador)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(conteudo.as_bytes());

    let colunas: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

    verificar_colunas_repetidas(&colunas, path)?;

    let linhas = rdr
        .records()
        .map(|result| {
            let record = result.map_err(|e| PatrimonioError::from_csv(e, path.to_path_buf()))?;
            Ok(record.iter().map(Celula::texto).collect())
        })
        .collect::<PatrimonioResult<Vec<Vec<Celula>>>>()?;

    Ok(Tabela { colunas, linhas })
}

/// UTF-8 (sem BOM) ou, na falha, Latin-1: cada byte é um code point.
fn decodificar(bytes: Vec<u8>) -> String {
    let texto = match String::from_utf8(bytes) {
        Ok(texto) => texto,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };

    match texto.strip_prefix('\u{feff}') {
        Some(resto) => resto.to_string(),
        None => texto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn arquivo_csv(conteudo: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(conteudo).unwrap();
        file
    }

    #[test]
    fn le_cabecalho_e_celulas() {
        let file = arquivo_csv(
            b"Classificacao_Contabil,Numero_Patrimonio,Descricao\n\
              12.0, 1 ,Mesa\n\
              ,2,\n",
        );

        let tabela = ler_planilha(file.path(), b',').unwrap();

        assert_eq!(
            tabela.colunas,
            ["Classificacao_Contabil", "Numero_Patrimonio", "Descricao"]
        );
        assert_eq!(tabela.len(), 2);
        assert_eq!(tabela.celula(0, 0), &Celula::Texto("12.0".into()));
        assert_eq!(tabela.celula(0, 1), &Celula::Texto("1".into()));
        assert_eq!(tabela.celula(1, 0), &Celula::Ausente);
        assert_eq!(tabela.celula(1, 2), &Celula::Ausente);
    }

    #[test]
    fn aceita_latin1_e_bom() {
        // "Móveis" em Latin-1: 'ó' = 0xF3
        let latin1 = arquivo_csv(b"Classificacao_Contabil;Numero_Patrimonio\nM\xF3veis;7\n");
        let tabela = ler_planilha(latin1.path(), b';').unwrap();
        assert_eq!(tabela.celula(0, 0), &Celula::Texto("Móveis".into()));

        let bom = arquivo_csv("\u{feff}Classificacao_Contabil,Numero_Patrimonio\nA,1\n".as_bytes());
        let tabela = ler_planilha(bom.path(), b',').unwrap();
        assert_eq!(tabela.indice_da_coluna("Classificacao_Contabil"), Some(0));
    }

    #[test]
    fn rejeita_colunas_repetidas() {
        let file = arquivo_csv(b"Numero_Patrimonio,Numero_Patrimonio\n1,2\n");
        assert!(matches!(
            ler_planilha(file.path(), b','),
            Err(PatrimonioError::ColunaDuplicada { coluna, .. }) if coluna == "Numero_Patrimonio"
        ));
    }

    #[test]
    fn rejeita_numero_de_colunas_divergente() {
        let file = arquivo_csv(b"a,b\n1,2\n3\n");
        assert!(matches!(
            ler_planilha(file.path(), b','),
            Err(PatrimonioError::ColumnCount {
                esperado: 2,
                encontrado: 1,
                ..
            })
        ));
    }

    #[test]
    fn le_primeira_aba_do_excel() -> Result<(), Box<dyn std::error::Error>> {
        let diretorio = tempfile::TempDir::new()?;
        let path = diretorio.path().join("patrimonio.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Classificacao_Contabil")?;
        worksheet.write_string(0, 1, "Numero_Patrimonio")?;
        worksheet.write_number(1, 0, 123110100.0)?;
        worksheet.write_number(1, 1, 1234.0)?;
        worksheet.write_string(2, 0, " Veículos ")?;
        worksheet.write_number(2, 1, 77.5)?;
        // classificação em branco na linha 3
        worksheet.write_number(3, 1, 9)?;
        workbook.save(&path)?;

        let tabela = ler_planilha(&path, b',')?;

        assert_eq!(tabela.colunas, ["Classificacao_Contabil", "Numero_Patrimonio"]);
        assert_eq!(tabela.len(), 3);
        assert_eq!(tabela.celula(0, 0), &Celula::Numero(123110100.0));
        assert_eq!(tabela.celula(0, 1), &Celula::Numero(1234.0));
        assert_eq!(tabela.celula(1, 0), &Celula::Texto("Veículos".into()));
        assert_eq!(tabela.celula(2, 0), &Celula::Ausente);
        Ok(())
    }

    #[test]
    fn rejeita_arquivo_inexistente() {
        assert!(matches!(
            ler_planilha(Path::new("nao_existe.xlsx"), b','),
            Err(PatrimonioError::Planilha { .. })
        ));
        assert!(matches!(
            ler_planilha(Path::new("nao_existe.csv"), b','),
            Err(PatrimonioError::IoReader { .. })
        ));
    }
}
