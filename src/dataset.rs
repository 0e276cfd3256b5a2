use std::path::Path;

use crate::error::{Error, Result};

/// One labeled training example
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input : Vec<f64>,
    pub target : Vec<f64>,
}

impl Sample {
    pub fn new(input : Vec<f64>, target : Vec<f64>) -> Self {
        Self { input, target }
    }
}

/// The four XOR cases, in the usual truth table order
pub fn xor_dataset() -> Vec<Sample> {
    let mut samples = Vec::with_capacity(4);
    for i in 0..=1 {
        for j in 0..=1 {
            let desired_out = ((i != 0) ^ (j != 0)) as i32 as f64;
            samples.push(Sample::new(vec![i as f64, j as f64], vec![desired_out]));
        }
    }
    samples
}

fn parse_values(text : &str, expected : usize, what : &str, line : usize) -> Result<Vec<f64>> {
    let values = text
        .split(',')
        .map(|v| {
            v.trim().parse::<f64>().map_err(|e| Error::Parse {
                line,
                message: format!("bad {} value {:?}: {}", what, v.trim(), e),
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    if values.len() != expected {
        return Err(Error::Parse {
            line,
            message: format!("expected {} {} values, found {}", expected, what, values.len()),
        });
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(Error::Parse { line, message: format!("{} value {} is not finite", what, v) });
    }
    Ok(values)
}

/// Parses one sample per line in the form `in1,in2,...;out1,...`.
///
/// Blank lines and lines starting with `#` are skipped. Line numbers in errors are 1-based.
pub fn parse_dataset(text : &str, input_size : usize, output_size : usize) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let (input, target) = raw.split_once(';').ok_or_else(|| Error::Parse {
            line,
            message: "missing ';' between input and target".to_string(),
        })?;
        samples.push(Sample::new(
            parse_values(input, input_size, "input", line)?,
            parse_values(target, output_size, "target", line)?,
        ));
    }
    Ok(samples)
}

pub fn read_dataset<P : AsRef<Path>>(path : P, input_size : usize, output_size : usize) -> Result<Vec<Sample>> {
    let text = std::fs::read_to_string(path)?;
    parse_dataset(&text, input_size, output_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_dataset() {
        let data = xor_dataset();
        let expected = [([0.0, 0.0], 0.0), ([0.0, 1.0], 1.0), ([1.0, 0.0], 1.0), ([1.0, 1.0], 0.0)];
        assert_eq!(data.len(), 4);
        for (sample, (input, target)) in data.iter().zip(expected) {
            assert_eq!(sample.input, input.to_vec());
            assert_eq!(sample.target, vec![target]);
        }
    }

    #[test]
    fn test_parse_dataset() {
        let text = "# xor\n0,0;0\n\n 0, 1 ; 1\n1,0;1\n1,1;0\n";
        let data = parse_dataset(text, 2, 1).unwrap();
        assert_eq!(data, xor_dataset());
    }

    #[test]
    fn test_parse_dataset_errors() {
        assert!(matches!(parse_dataset("0,0;0\n0,1\n", 2, 1), Err(Error::Parse { line: 2, .. })));
        assert!(matches!(parse_dataset("0,0,1;0\n", 2, 1), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(parse_dataset("0,x;0\n", 2, 1), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(parse_dataset("0,inf;0\n", 2, 1), Err(Error::Parse { line: 1, .. })));
        assert!(parse_dataset("", 2, 1).unwrap().is_empty());
    }
}
