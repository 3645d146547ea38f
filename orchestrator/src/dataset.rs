use std::{
    error::Error,
    fmt::{self, Display},
    fs, io,
    path::Path,
};

use engine::Sample;
use rand::{Rng, seq::SliceRandom};

/// Errors building a `Dataset`.
#[derive(Debug)]
pub enum DatasetError {
    EmptyRow,
    Empty,
    Ragged { len: usize, row_size: usize },
    Parse { line: usize, value: String },
    RowLength { line: usize, got: usize, expected: usize },
    Io(io::Error),
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRow => f.write_str("x_size + y_size must be greater than 0"),
            Self::Empty => f.write_str("dataset must have at least one sample"),
            Self::Ragged { len, row_size } => write!(
                f,
                "dataset length ({len}) is not divisible by x_size + y_size ({row_size})"
            ),
            Self::Parse { line, value } => {
                write!(f, "line {line}: cannot parse '{value}' as f32")
            }
            Self::RowLength {
                line,
                got,
                expected,
            } => write!(f, "line {line}: expected {expected} values, got {got}"),
            Self::Io(e) => write!(f, "cannot read dataset: {e}"),
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// An in-memory supervised dataset, every row being `x_size` inputs followed by `y_size`
/// expected outputs.
///
/// Rows are never moved, shuffling only permutes the order batches are drawn in.
#[derive(Debug, Clone)]
pub struct Dataset {
    x_size: usize,
    y_size: usize,
    data: Vec<f32>,
    order: Vec<usize>,
}

impl Dataset {
    /// Creates a new `Dataset` from flat rows.
    ///
    /// # Arguments
    /// * `data` - The concatenated rows.
    /// * `x_size` - The amount of inputs per row.
    /// * `y_size` - The amount of expected outputs per row.
    ///
    /// # Returns
    /// A new `Dataset` or an error if the data can't be split in whole, non-empty rows.
    pub fn new(data: Vec<f32>, x_size: usize, y_size: usize) -> Result<Self, DatasetError> {
        let row_size = x_size + y_size;

        if row_size == 0 {
            return Err(DatasetError::EmptyRow);
        }

        if data.len() % row_size != 0 {
            return Err(DatasetError::Ragged {
                len: data.len(),
                row_size,
            });
        }

        if data.is_empty() {
            return Err(DatasetError::Empty);
        }

        let order = (0..data.len() / row_size).collect();

        Ok(Self {
            x_size,
            y_size,
            data,
            order,
        })
    }

    /// Parses comma separated rows, skipping blank lines.
    pub fn parse_csv(content: &str, x_size: usize, y_size: usize) -> Result<Self, DatasetError> {
        let row_size = x_size + y_size;
        let mut data = Vec::new();

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let values = line
                .split(',')
                .map(|v| {
                    v.trim().parse::<f32>().map_err(|_| DatasetError::Parse {
                        line: i + 1,
                        value: v.trim().to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if values.len() != row_size {
                return Err(DatasetError::RowLength {
                    line: i + 1,
                    got: values.len(),
                    expected: row_size,
                });
            }

            data.extend(values);
        }

        Self::new(data, x_size, y_size)
    }

    /// Reads and parses a CSV file.
    pub fn from_csv<P: AsRef<Path>>(
        path: P,
        x_size: usize,
        y_size: usize,
    ) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path)?;
        Self::parse_csv(&content, x_size, y_size)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    #[inline]
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Returns the `idx`-th row in storage order.
    pub fn sample(&self, idx: usize) -> Sample<'_> {
        let start = idx * (self.x_size + self.y_size);
        let (x, y) = self.data[start..start + self.x_size + self.y_size].split_at(self.x_size);
        Sample::new(x, y)
    }

    /// Permutes the order in which `batches` yields the rows.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
    }

    /// Splits the rows in batches of `batch_size`, the last one may be shorter.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = Vec<Sample<'_>>> + '_ {
        self.order
            .chunks(batch_size.max(1))
            .map(|chunk| chunk.iter().map(|&idx| self.sample(idx)).collect())
    }
}
