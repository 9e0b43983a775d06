use std::path::Path;

use crate::error::PlotError;

/// How fields in a row are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Any run of spaces or tabs.
    #[default]
    Whitespace,
    /// A single ASCII separator such as `,` or `;`.
    Byte(u8),
}

impl Delimiter {
    /// Map the optional delimiter stored in the settings file.
    pub fn from_setting(setting: Option<char>) -> Self {
        match setting {
            None => Delimiter::Whitespace,
            Some(c) => match u8::try_from(c) {
                Ok(b) if b.is_ascii() && !b.is_ascii_whitespace() => Delimiter::Byte(b),
                _ => {
                    tracing::warn!("Unsupported delimiter {c:?}, using whitespace");
                    Delimiter::Whitespace
                }
            },
        }
    }
}

/// Result of loading a data file: column names and numeric column data.
pub struct LoadedData {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<f64>>, // column-major: column_data[col_idx][row_idx]
    pub row_count: usize,
}

impl LoadedData {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Load a delimited text table. The first non-blank line is the header.
pub fn load_table(path: &Path, delimiter: Delimiter) -> Result<LoadedData, PlotError> {
    if !path.exists() {
        return Err(PlotError::MissingFile(path.to_path_buf()));
    }

    let content = std::fs::read(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&content);
    // Editors on Windows often save UTF-8 with a byte-order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let rows = match delimiter {
        Delimiter::Whitespace => {
            tracing::debug!("Delimiter: any whitespace");
            Ok(split_whitespace_rows(&text))
        }
        Delimiter::Byte(b) => {
            tracing::debug!("Delimiter: {:?}", b as char);
            read_delimited_rows(&text, b)
        }
    }
    .map_err(|detail| PlotError::Parse {
        path: path.to_path_buf(),
        detail,
    })?;

    build_table(rows).map_err(|detail| PlotError::Parse {
        path: path.to_path_buf(),
        detail,
    })
}

/// A row of raw fields together with its 1-based source line.
type RawRow = (usize, Vec<String>);

fn split_whitespace_rows(text: &str) -> Vec<RawRow> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.split_whitespace().map(str::to_string).collect()))
        .collect()
}

fn read_delimited_rows(text: &str, delimiter: u8) -> Result<Vec<RawRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push((line, record.iter().map(str::to_string).collect()));
    }
    Ok(rows)
}

fn build_table(rows: Vec<RawRow>) -> Result<LoadedData, String> {
    let mut rows = rows.into_iter();
    let Some((_, columns)) = rows.next() else {
        return Err("No columns to parse from file".to_string());
    };
    let num_cols = columns.len();

    // Short rows are padded; long rows cannot be attributed to a column.
    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); num_cols];
    for (line, row) in rows {
        if row.len() > num_cols {
            return Err(format!(
                "Expected {num_cols} fields in line {line}, saw {}",
                row.len()
            ));
        }
        for (col_idx, col) in raw_columns.iter_mut().enumerate() {
            col.push(row.get(col_idx).cloned().unwrap_or_default());
        }
    }

    let row_count = raw_columns.first().map(Vec::len).unwrap_or(0);
    let column_data = raw_columns
        .iter()
        .zip(&columns)
        .map(|(raw, name)| {
            let (values, frac) = column_to_f64(raw);
            if frac < 1.0 && !raw.is_empty() {
                tracing::debug!("Column {name}: {:.0}% numeric", frac * 100.0);
            }
            values
        })
        .collect();

    tracing::debug!("Table size: columns={num_cols}, rows={row_count}");
    Ok(LoadedData {
        columns,
        column_data,
        row_count,
    })
}

/// Extract numeric f64 values from a string column.
/// Returns (values, fraction_valid) where invalid entries become NaN.
pub fn column_to_f64(data: &[String]) -> (Vec<f64>, f64) {
    let mut values = Vec::with_capacity(data.len());
    let mut valid = 0usize;
    for s in data {
        match s.trim().parse::<f64>() {
            Ok(v) => {
                values.push(v);
                if v.is_finite() {
                    valid += 1;
                }
            }
            Err(_) => values.push(f64::NAN),
        }
    }
    let frac = if data.is_empty() { 0.0 } else { valid as f64 / data.len() as f64 };
    (values, frac)
}
