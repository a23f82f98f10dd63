// Format-neutral rows handed from the readers to the extractor

/// A raw cell value as the reader found it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Display text, trimmed. Integral floats print without decimals.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Int(n) => n.to_string(),
            Cell::Float(n) => format_float(*n),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
        }
    }
}

/// Header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build from raw rows; the first row becomes the (trimmed) header.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0).iter().map(Cell::to_text).collect();
        Self { headers, rows }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

pub(crate) fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
