/*!
 * Tests for table file I/O
 */

use anyhow::Result;

use sheetlate::file_utils::FileManager;
use sheetlate::table::{Table, failure_marker};

use crate::common;

#[test]
fn test_read_table_withCsv_shouldKeepHeaderOrderAndEmptyCells() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_csv(dir.path(), "products.csv")?;

    let table = FileManager::read_table(&path)?;

    assert_eq!(table.fields(), ["id", "desc"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.get_cell(1, "desc"), Some(""));
    assert_eq!(table.get_cell(2, "desc"), Some("World"));
    Ok(())
}

#[test]
fn test_read_table_withDuplicateHeaders_shouldDisambiguate() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "dup.csv", "name,,name\na,b,c\n")?;

    let table = FileManager::read_table(&path)?;

    assert_eq!(table.fields(), ["name", "column_2", "name_2"]);
    assert_eq!(table.get_cell(0, "name_2"), Some("c"));
    Ok(())
}

#[test]
fn test_read_table_withUnsupportedExtension_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "notes.txt", "a,b\n")?;
    assert!(FileManager::read_table(&path).is_err());
    Ok(())
}

#[test]
fn test_write_table_thenRead_withCsv_shouldPreserveMarkersAndUnicode() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out.csv");
    let mut table = common::sample_table();
    table.set_cell(0, "desc_es", "Hola, \"mundo\"");
    table.set_cell(2, "desc_es", failure_marker("timeout"));
    table.set_cell(2, "desc_ja", "世界");

    FileManager::write_table(&table, &path)?;
    let read = FileManager::read_table(&path)?;

    assert_eq!(read.fields(), table.fields());
    assert_eq!(read.get_cell(0, "desc_es"), Some("Hola, \"mundo\""));
    assert_eq!(read.failed_cells("desc_es").len(), 1);
    assert_eq!(read.get_cell(2, "desc_ja"), Some("世界"));
    Ok(())
}

#[test]
fn test_write_table_thenRead_withXlsx_shouldKeepColumns() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("nested").join("out.xlsx");
    let mut table = Table::new(["desc"]);
    table.push_row(["Hello"]);
    table.push_row(["World"]);
    table.set_cell(1, "desc_fr", "Monde");

    FileManager::write_table(&table, &path)?;
    let read = FileManager::read_table(&path)?;

    assert_eq!(read.fields(), ["desc", "desc_fr"]);
    assert_eq!(read.row_count(), 2);
    assert_eq!(read.get_cell(1, "desc_fr"), Some("Monde"));
    assert_eq!(read.get_cell(0, "desc_fr"), Some(""));
    Ok(())
}

#[test]
fn test_write_template_shouldProduceReadableWorkbook() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("template.xlsx");

    FileManager::write_template(&path)?;
    let read = FileManager::read_table(&path)?;

    assert_eq!(read, FileManager::template_table());
    Ok(())
}

#[test]
fn test_read_table_withRowWiderThanHeader_shouldKeepExtraValues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "wide.csv", "id,desc\n1,Hello,extra\n2,World\n")?;

    let table = FileManager::read_table(&path)?;

    assert_eq!(table.fields(), ["id", "desc", "column_3"]);
    assert_eq!(table.get_cell(0, "column_3"), Some("extra"));
    assert_eq!(table.get_cell(1, "column_3"), None);

    let out = dir.path().join("Translated_wide.csv");
    FileManager::write_table(&table, &out)?;
    let written = std::fs::read_to_string(&out)?;
    assert!(written.contains("1,Hello,extra"));
    Ok(())
}

#[test]
fn test_read_table_withWideRowAndTakenName_shouldPickUniqueField() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "wide.csv", "column_3,desc\na,b,c\n")?;

    let table = FileManager::read_table(&path)?;

    assert_eq!(table.fields(), ["column_3", "desc", "column_3_2"]);
    assert_eq!(table.get_cell(0, "column_3_2"), Some("c"));
    Ok(())
}

#[test]
fn test_write_table_withXlsx_shouldKeepNumbersNumeric() -> Result<()> {
    use calamine::{Data, Reader, open_workbook_auto};

    let dir = common::create_temp_dir()?;
    let path = dir.path().join("numbers.xlsx");
    let mut table = Table::new(["id", "code", "desc"]);
    table.push_row(["42", "007", "Hello"]);

    FileManager::write_table(&table, &path)?;

    let mut workbook = open_workbook_auto(&path)?;
    let range = workbook.worksheet_range("Translations")?;
    assert_eq!(range.get_value((1, 0)), Some(&Data::Float(42.0)));
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("007".to_string())));
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("Hello".to_string())));
    Ok(())
}
