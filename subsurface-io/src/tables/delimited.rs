use std::io::BufRead;

use subsurface_core::{Error, Result};

/// Options for parsing delimited text tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedTableOptions {
    pub delimiter: char,
}

impl Default for DelimitedTableOptions {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

/// A parsed delimited text table: a header row followed by data rows. Empty lines and lines starting with `#` are
/// skipped. Line numbers are kept for error messages
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedTable {
    headers: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl DelimitedTable {
    pub fn from_read<R: BufRead>(reader: R, options: DelimitedTableOptions) -> Result<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(idx, line)| line.map(|l| (idx + 1, l)))
            .filter(|line| match line {
                Ok((_, l)) => !l.trim().is_empty() && !l.trim_start().starts_with('#'),
                Err(_) => true,
            });

        let headers = match lines.next() {
            Some(line) => split_line(&line?.1, options.delimiter),
            None => return Err(Error::format("table is empty, expected a header row")),
        };
        let rows = lines
            .map(|line| {
                let (line_number, line) = line?;
                let fields = split_line(&line, options.delimiter);
                if fields.len() != headers.len() {
                    return Err(Error::format(format!(
                        "line {}: expected {} fields but got {}",
                        line_number,
                        headers.len(),
                        fields.len()
                    )));
                }
                Ok((line_number, fields))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first column whose header matches one of `aliases`
    pub fn find_column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            self.headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(alias))
        })
    }

    /// Like [`find_column`](DelimitedTable::find_column), but fails if none of the aliases is present
    pub fn require_column(&self, aliases: &[&str]) -> Result<usize> {
        self.find_column(aliases).ok_or_else(|| {
            Error::format(format!(
                "table has no column named any of ({}), columns are ({})",
                aliases.join(", "),
                self.headers.join(", ")
            ))
        })
    }

    /// Iterator over the data rows
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(move |(line_number, fields)| TableRow {
            line_number: *line_number,
            fields,
            headers: &self.headers,
        })
    }
}

/// One data row of a [`DelimitedTable`]
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    line_number: usize,
    fields: &'a [String],
    headers: &'a [String],
}

impl<'a> TableRow<'a> {
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn text(&self, column: usize) -> &'a str {
        &self.fields[column]
    }

    /// Parses the field in `column` as a number. Fails if the field is empty or not a number
    pub fn number(&self, column: usize) -> Result<f64> {
        self.optional_number(column)?.ok_or_else(|| {
            Error::format(format!(
                "line {}: column '{}' is empty",
                self.line_number, self.headers[column]
            ))
        })
    }

    /// Parses the field in `column` as a number. Empty fields (and `NaN`) are `None`
    pub fn optional_number(&self, column: usize) -> Result<Option<f64>> {
        let field = self.fields[column].as_str();
        if field.is_empty() {
            return Ok(None);
        }
        let value = field.parse::<f64>().map_err(|_| {
            Error::format(format!(
                "line {}: cannot parse '{}' in column '{}' as a number",
                self.line_number, field, self.headers[column]
            ))
        })?;
        Ok(if value.is_nan() { None } else { Some(value) })
    }
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|field| field.trim().trim_matches('"').to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use subsurface_core::ErrorKind;

    #[test]
    fn test_parse_table() -> Result<()> {
        let text = "# exported\nWELL_ID;MD\n\nW1; 10.5\n\"W2\";\n";
        let table = DelimitedTable::from_read(text.as_bytes(), DelimitedTableOptions { delimiter: ';' })?;
        assert_eq!(table.headers(), ["WELL_ID", "MD"]);
        assert_eq!(table.n_rows(), 2);
        let md = table.require_column(&["md", "depth"])?;
        let rows = table.rows().collect::<Vec<_>>();
        assert_eq!(rows[0].number(md)?, 10.5);
        assert_eq!(rows[1].text(0), "W2");
        assert_eq!(rows[1].optional_number(md)?, None);
        assert_eq!(rows[1].line_number(), 5);
        Ok(())
    }

    #[test]
    fn test_errors_name_the_line() -> Result<()> {
        let table = DelimitedTable::from_read("id,md\nW1,abc\n".as_bytes(), Default::default())?;
        let err = table.rows().next().unwrap().number(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("line 2"));

        let err = DelimitedTable::from_read("id,md\nW1\n".as_bytes(), Default::default()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        Ok(())
    }
}
