use super::*;
use crate::error::FrameError;
use crate::table::TableBuilder;
use crate::types::Value;
use std::fmt::Write as _;
use std::io;

/// Comma separated text held in memory
struct TextSource {
    text: String,
}

impl TableSource<String, String> for TextSource {
    type Options = ReadOptions<String>;

    fn read(&self, options: ReadOptions<String>) -> FrameResult<Table<String, String>> {
        let mut lines = self.text.lines();
        let names: Vec<String> = match (options.header(), lines.clone().next()) {
            (true, Some(header)) => {
                lines.next();
                header.split(',').map(str::to_string).collect()
            }
            (_, first) => {
                let width = first.map(|line| line.split(',').count()).unwrap_or(0);
                (0..width).map(|i| format!("column_{}", i)).collect()
            }
        };

        let mut builder = TableBuilder::new();
        for (record, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(',').collect();
            let row = options
                .parse_row_key(&fields)?
                .unwrap_or_else(|| record.to_string());
            for (index, field) in fields.iter().enumerate() {
                if !options.is_column_included(index) {
                    continue;
                }
                let name = names.get(index).ok_or_else(|| {
                    FrameError::source_read(format!("record {} has too many fields", record))
                })?;
                let value = options.parse_value(name, field)?;
                builder.put_value(row.clone(), options.column_name(name, index), value);
            }
        }
        Ok(builder.build())
    }
}

/// Source whose device always fails
struct BrokenSource;

impl TableSource<String, String> for BrokenSource {
    type Options = ReadOptions<String>;

    fn read(&self, options: ReadOptions<String>) -> FrameResult<Table<String, String>> {
        let resource = options.require_resource()?;
        Err(FrameError::source_read(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", resource),
        )))
    }
}

/// Sink rendering comma separated text into a string
#[derive(Default)]
struct TextSink {
    output: String,
}

impl TableSink<String, String> for TextSink {
    type Options = WriteOptions;

    fn write(&mut self, table: &Table<String, String>, options: WriteOptions) -> FrameResult<()> {
        if options.header {
            let title = options.title.unwrap_or_default();
            let names: Vec<&str> = table.cols().keys().map(String::as_str).collect();
            writeln!(self.output, "{},{}", title, names.join(",")).map_err(FrameError::sink_write)?;
        }
        for row in table.rows_iter() {
            let cells: Vec<String> = row.values().map(|value| value.to_string()).collect();
            writeln!(self.output, "{},{}", row.key(), cells.join(","))
                .map_err(FrameError::sink_write)?;
        }
        Ok(())
    }
}

const CARS: &str = "id,make,price,mpg\n1,Audi,29.1,25\n2,BMW,30.0,24\n3,Buick,,27";

#[test]
fn test_read_with_configurator() {
    let source = TextSource {
        text: CARS.to_string(),
    };
    let table = source
        .read_with(|options| {
            options
                .set_exclude_column_indexes([0])
                .set_row_key_parser(|fields| Ok(format!("car-{}", fields[0])));
        })
        .unwrap();

    assert_eq!(table.row_count(), 3);
    assert_eq!(table.col_count(), 3);
    assert!(!table.contains_col(&"id".to_string()));
    assert_eq!(
        table.get_value(&"car-1".to_string(), &"make".to_string()).unwrap(),
        Value::from("Audi")
    );
    assert_eq!(
        table.get_double(&"car-2".to_string(), &"price".to_string()).unwrap(),
        30.0
    );
    assert!(table
        .get_double(&"car-3".to_string(), &"price".to_string())
        .unwrap()
        .is_nan());
    assert_eq!(
        table.get_int(&"car-3".to_string(), &"mpg".to_string()).unwrap(),
        27
    );
}

#[test]
fn test_read_with_parsers_and_mapping() {
    let source = TextSource {
        text: CARS.to_string(),
    };
    let mut options = ReadOptions::new();
    options
        .set_include_column_indexes([1, 3])
        .set_parser("mpg", |raw| {
            raw.parse::<f64>()
                .map(|mpg| Value::Double(mpg * 0.425))
                .map_err(FrameError::source_read)
        })
        .set_column_name_mapping(|name, index| format!("{}_{}", name.to_uppercase(), index));

    let table = source.read(options).unwrap();
    let cols: Vec<&String> = table.cols().keys().collect();
    assert_eq!(cols, vec!["MAKE_1", "MPG_3"]);
    assert_eq!(
        table.get_double(&"0".to_string(), &"MPG_3".to_string()).unwrap(),
        25.0 * 0.425
    );
}

#[test]
fn test_parser_failure_surfaces_unchanged() {
    let source = TextSource {
        text: "a\nnot-a-number".to_string(),
    };
    let result = source.read_with(|options| {
        options.set_parser("a", |raw| {
            raw.parse::<i64>()
                .map(Value::Long)
                .map_err(FrameError::source_read)
        });
    });
    match result {
        Err(FrameError::SourceRead(err)) => {
            assert!(err.downcast_ref::<std::num::ParseIntError>().is_some())
        }
        other => panic!("expected source read error, got {:?}", other),
    }
}

#[test]
fn test_source_errors() {
    let result = BrokenSource.read_with(|_| {});
    assert!(matches!(result, Err(FrameError::InvalidConfig(_))));

    let result = BrokenSource.read_with(|options| {
        options.set_resource("missing.csv");
    });
    match result {
        Err(FrameError::SourceRead(err)) => {
            assert_eq!(err.to_string(), "missing.csv does not exist");
            let io_err = err.downcast_ref::<io::Error>().unwrap();
            assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected source read error, got {:?}", other),
    }
}

#[test]
fn test_read_without_header() {
    let source = TextSource {
        text: "1,true\n2,false".to_string(),
    };
    let table = source
        .read_with(|options| {
            options.set_header(false);
        })
        .unwrap();
    assert_eq!(table.row_count(), 2);
    assert!(
        table
            .get_boolean(&"0".to_string(), &"column_1".to_string())
            .unwrap()
    );
}

#[test]
fn test_write_with_title() {
    let mut builder = TableBuilder::new();
    builder
        .put_double("r1".to_string(), "A".to_string(), 1.5)
        .put_int("r1".to_string(), "B".to_string(), 7)
        .put_double("r2".to_string(), "A".to_string(), 2.0);
    let table = builder.build();

    let mut sink = TextSink::default();
    sink.write_with(&table, |options| {
        options.set_title("key");
    })
    .unwrap();
    assert_eq!(sink.output, "key,A,B\nr1,1.5,7\nr2,2,0\n");

    let mut sink = TextSink::default();
    let mut options = WriteOptions::default();
    options.set_header(false);
    sink.write(&table, options).unwrap();
    assert_eq!(sink.output.lines().count(), 2);
}

#[test]
fn test_infer_value() {
    assert_eq!(infer_value(""), Value::Null);
    assert_eq!(infer_value("true"), Value::Boolean(true));
    assert_eq!(infer_value("12"), Value::Int(12));
    assert_eq!(infer_value("5000000000"), Value::Long(5_000_000_000));
    assert_eq!(infer_value("2.5"), Value::Double(2.5));
    assert_eq!(infer_value("Audi"), Value::from("Audi"));
    assert_eq!(infer_value(" 12 "), Value::Int(12));
    assert_eq!(infer_value(" Audi A4 "), Value::from("Audi A4"));
    assert_eq!(infer_value("   "), Value::Null);
}

#[test]
fn test_read_options_inclusion() {
    let mut options: ReadOptions<String> = ReadOptions::default();
    assert!(options.header());
    assert!(options.is_column_included(7));
    assert_eq!(options.parse_row_key(&["x"]).unwrap(), None);

    options
        .set_include_column_indexes([1, 2])
        .set_exclude_column_indexes([2]);
    assert!(!options.is_column_included(0));
    assert!(options.is_column_included(1));
    assert!(!options.is_column_included(2));
    assert!(format!("{:?}", options).contains("include_column_indexes"));
}

#[test]
fn test_write_options_from_json() {
    let options: WriteOptions = serde_json::from_str(r#"{ "title": "DataFrame" }"#).unwrap();
    assert_eq!(options.title.as_deref(), Some("DataFrame"));
    assert!(options.header);
}
