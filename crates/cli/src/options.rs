use optmap_argparse::{Schema, SchemaError};

pub const NAME: &str = "--name";
pub const OUTPUT: &str = "--output";
pub const HELP: &str = "--help";
pub const VERBOSE: &str = "--verbose";

/// Options understood by the `optmap` binary, in help-listing order.
pub fn schema() -> Result<Schema, SchemaError> {
    let mut schema = Schema::new();
    schema
        .try_register("-n", NAME, true, "Specify user name")?
        .try_register("-o", OUTPUT, true, "Specify output file")?
        .try_register("-h", HELP, false, "Show help message")?
        .try_register("-v", VERBOSE, false, "Enable verbose mode")?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_four_options() {
        let schema = schema().unwrap();
        let longs: Vec<&str> = schema.iter().map(|d| d.long.as_str()).collect();
        assert_eq!(longs, vec![NAME, OUTPUT, HELP, VERBOSE]);
        assert!(schema.find("-n").unwrap().takes_value);
        assert!(!schema.find("-v").unwrap().takes_value);
    }
}
