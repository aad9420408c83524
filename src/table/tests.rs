use super::*;
use crate::array::Array;
use crate::error::FrameError;
use crate::stats::{Max, Mean, Statistic};
use crate::types::{ArrayType, Value};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

fn sample_table() -> Table<&'static str, &'static str> {
    let mut builder = TableBuilder::new();
    builder
        .put_double("r1", "A", 1.0)
        .put_double("r2", "A", 2.0)
        .put_int("r1", "B", 7);
    builder.build()
}

#[test]
fn test_builder_scenario() {
    let table = sample_table();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.col_count(), 2);
    assert_eq!(table.get_double(&"r1", &"A").unwrap(), 1.0);
    assert_eq!(table.get_int(&"r1", &"B").unwrap(), 7);
    assert_eq!(table.get_int(&"r2", &"B").unwrap(), 0);
    assert_eq!(table.column_type(&"A").unwrap(), ArrayType::Double);
    assert_eq!(table.column_type(&"B").unwrap(), ArrayType::Int);
}

#[test]
fn test_missing_keys_and_ordinals() {
    let table = sample_table();

    assert!(matches!(
        table.get_double(&"r9", &"A"),
        Err(FrameError::KeyNotFound(_))
    ));
    assert!(matches!(
        table.get_double(&"r1", &"Z"),
        Err(FrameError::KeyNotFound(_))
    ));
    assert!(matches!(
        table.get_double_at(0, 5),
        Err(FrameError::OutOfBounds { ordinal: 5, len: 2 })
    ));
    assert!(matches!(
        table.get_double_at(2, 0),
        Err(FrameError::OutOfBounds { ordinal: 2, len: 2 })
    ));
    assert_eq!(table.get_long_at(0, 1).unwrap(), 7);
    assert!(matches!(
        table.get_boolean(&"r1", &"A"),
        Err(FrameError::TypeMismatch { .. })
    ));
}

#[test]
fn test_concurrent_puts() {
    let builder = Arc::new(TableBuilder::new().thread_safe());
    let num_threads = 8;
    let puts_per_thread = 250;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let builder = Arc::clone(&builder);
            thread::spawn(move || {
                for i in 0..puts_per_thread {
                    let row = format!("row_{}", i % 50);
                    let col = format!("col_{}_{}", thread_id, i / 50);
                    builder.put_double(row, col, (thread_id * puts_per_thread + i) as f64);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let table = builder.build();
    assert_eq!(table.row_count(), 50);
    assert_eq!(table.col_count(), num_threads * 5);

    let mut populated = 0;
    for thread_id in 0..num_threads {
        for i in 0..puts_per_thread {
            let row = format!("row_{}", i % 50);
            let col = format!("col_{}_{}", thread_id, i / 50);
            let value = table.get_double(&row, &col).unwrap();
            assert_eq!(value, (thread_id * puts_per_thread + i) as f64);
            populated += 1;
        }
    }
    assert_eq!(populated, num_threads * puts_per_thread);

    let set: usize = table
        .columns()
        .map(|column| column.doubles().unwrap().filter(|v| !v.is_nan()).count())
        .sum();
    assert_eq!(set, num_threads * puts_per_thread);
}

#[test]
fn test_combine_first_precedence() {
    let mut first = TableBuilder::new();
    first.put_double("r", "c", 1.0).put_double("only1", "c", 5.0);
    let mut second = TableBuilder::new();
    second
        .put_double("r", "c", 2.0)
        .put_double("only2", "c", 6.0)
        .put_double("r", "d", 3.0);

    let first = first.build();
    let second = second.build();
    let combined = Table::combine_first(&[&first, &second]);

    assert_eq!(combined.get_double(&"r", &"c").unwrap(), 1.0);
    assert_eq!(combined.get_double(&"only1", &"c").unwrap(), 5.0);
    assert_eq!(combined.get_double(&"only2", &"c").unwrap(), 6.0);
    assert_eq!(combined.get_double(&"r", &"d").unwrap(), 3.0);
    assert!(combined.get_double(&"only1", &"d").unwrap().is_nan());
    assert_eq!(combined.rows().as_slice(), &["r", "only1", "only2"]);
    assert_eq!(combined.cols().as_slice(), &["c", "d"]);

    let reversed = Table::combine_first(&[&second, &first]);
    assert_eq!(reversed.get_double(&"r", &"c").unwrap(), 2.0);
}

#[test]
fn test_combine_first_mixed_kinds_fall_back_to_object() {
    let mut first = TableBuilder::new();
    first.put_int(1, "v", 10);
    let mut second = TableBuilder::new();
    second.put_value(2, "v", "text").put_value(1, "v", "ignored");

    let combined = Table::combine_first(&[&first.build(), &second.build()]);
    assert_eq!(combined.column_type(&"v").unwrap(), ArrayType::Object);
    assert_eq!(combined.get_value(&1, &"v").unwrap(), Value::Int(10));
    assert_eq!(combined.get_value(&2, &"v").unwrap(), Value::from("text"));
}

#[test]
fn test_combine_first_skips_null_objects() {
    let mut first = TableBuilder::new();
    first
        .put_value("a", "name", Value::Null)
        .put_value("b", "name", "bob");
    let mut second = TableBuilder::new();
    second.put_value("a", "name", "alice");

    let combined = Table::combine_first(&[&first.build(), &second.build()]);
    assert_eq!(combined.get_value(&"a", &"name").unwrap(), Value::from("alice"));
    assert_eq!(combined.get_value(&"b", &"name").unwrap(), Value::from("bob"));
}

#[test]
fn test_combine_first_fills_rows_left_unset_by_widening() {
    let mut first = TableBuilder::new();
    first
        .put_int("r1", "c", 1)
        .put_double("r2", "c", 2.5)
        .put_double("r3", "d", 1.0);
    let mut second = TableBuilder::new();
    second.put_double("r3", "c", 9.0);

    let combined = Table::combine_first(&[&first.build(), &second.build()]);
    assert_eq!(combined.get_double(&"r1", &"c").unwrap(), 1.0);
    assert_eq!(combined.get_double(&"r3", &"c").unwrap(), 9.0);
}

#[test]
fn test_combine_first_of_nothing() {
    let combined: Table<i32, i32> = Table::combine_first(&[]);
    assert_eq!(combined, Table::empty());
}

#[test]
fn test_replace_col_key_duplicate_leaves_table_unchanged() {
    let mut table = sample_table();
    let before = table.clone();

    assert!(matches!(
        table.replace_col_key(&"A", "B"),
        Err(FrameError::DuplicateKey(_))
    ));
    assert_eq!(table, before);

    table.replace_col_key(&"A", "X").unwrap();
    assert_eq!(table.cols().as_slice(), &["X", "B"]);
    assert_eq!(table.get_double(&"r2", &"X").unwrap(), 2.0);
}

#[test]
fn test_put_all_round_trip() {
    let mut builder = TableBuilder::new();
    builder.fill_pct("sparse", 0.1).unwrap();
    for i in 0..100 {
        builder
            .put_double(i, "d", i as f64 * 0.5)
            .put_long(i, "l", i as i64 * 1000)
            .put_boolean(i, "b", i % 3 == 0);
        if i % 10 == 0 {
            builder.put_int(i, "sparse", i);
        }
        if i % 7 == 0 {
            builder.put_value(i, "o", format!("item {}", i));
        }
    }
    let table = builder.build();

    let mut copy = TableBuilder::new();
    copy.put_all(&table);
    let copy = copy.build();

    assert_eq!(copy, table);
    assert!(copy.column_array(&"sparse").unwrap().is_sparse());
    assert_eq!(copy.to_builder().build(), table);
}

#[test]
fn test_put_all_merges_into_existing() {
    let mut builder = TableBuilder::new();
    builder.put_double("r0", "A", 0.5);
    builder.put_all(&sample_table());

    let table = builder.build();
    assert_eq!(table.rows().as_slice(), &["r0", "r1", "r2"]);
    assert_eq!(table.get_double(&"r0", &"A").unwrap(), 0.5);
    assert_eq!(table.get_int(&"r1", &"B").unwrap(), 7);
    assert_eq!(table.get_int(&"r0", &"B").unwrap(), 0);
}

#[test]
fn test_set_cells() {
    let mut table = sample_table();
    table.set_double(&"r2", &"A", 20.0).unwrap();
    table.set_int(&"r2", &"B", 8).unwrap();
    table.set_value(&"r1", &"A", Value::Null).unwrap();

    assert_eq!(table.get_double(&"r2", &"A").unwrap(), 20.0);
    assert_eq!(table.get_int(&"r2", &"B").unwrap(), 8);
    assert!(table.get_double(&"r1", &"A").unwrap().is_nan());

    assert!(matches!(
        table.set_boolean(&"r1", &"B", true),
        Err(FrameError::TypeMismatch { .. })
    ));
    assert!(matches!(
        table.set_value(&"r1", &"B", "text"),
        Err(FrameError::TypeMismatch { .. })
    ));
    assert!(matches!(
        table.set_double(&"r3", &"A", 1.0),
        Err(FrameError::KeyNotFound(_))
    ));
}

#[test]
fn test_table_of() {
    let table = Table::of(vec!["x", "y", "z"], |columns| {
        columns.add_doubles("len", |row| row.len() as f64)?;
        columns.add_booleans("is_y", |row| *row == "y")?;
        columns.add("short", Array::of_longs(vec![1, 2]))?;
        columns.add_values("mixed", |row| match *row {
            "x" => Value::Int(1),
            _ => Value::Double(2.5),
        })?;
        Ok(())
    })
    .unwrap();

    assert_eq!(table.col_count(), 4);
    assert!(table.get_boolean(&"y", &"is_y").unwrap());
    assert_eq!(table.get_long(&"z", &"short").unwrap(), 0);
    assert_eq!(table.column_type(&"mixed").unwrap(), ArrayType::Double);
    assert_eq!(table.get_double(&"x", &"mixed").unwrap(), 1.0);
}

#[test]
fn test_table_of_rejects_bad_columns() {
    let duplicate = Table::of(vec![1, 2], |columns| {
        columns.add_ints("a", |_| 1)?;
        columns.add_ints("a", |_| 2)?;
        Ok(())
    });
    assert!(matches!(duplicate, Err(FrameError::DuplicateKey(_))));

    let too_long = Table::of(vec![1, 2], |columns| {
        columns.add("a", Array::of_ints(vec![1, 2, 3]))?;
        Ok(())
    });
    assert!(matches!(
        too_long,
        Err(FrameError::LengthMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn test_of_doubles() {
    let table = Table::of_doubles(0..1000, ["a", "b", "c"], |row, col| match *col {
        "a" => *row as f64,
        "b" => 1.0,
        _ => f64::NAN,
    })
    .unwrap();

    assert_eq!(table.row_count(), 1000);
    assert_eq!(table.column(&"a").unwrap().sum().unwrap(), 499500.0);
    assert_eq!(table.column(&"b").unwrap().mean().unwrap(), 1.0);
    assert!(table.column(&"c").unwrap().mean().unwrap().is_nan());
    assert_eq!(table.column(&"a").unwrap().median().unwrap(), 499.5);
}

#[test]
fn test_column_view() {
    let table = sample_table();
    let column = table.column(&"B").unwrap();
    assert_eq!(column.key(), &"B");
    assert_eq!(column.ordinal(), 1);
    assert_eq!(column.len(), 2);
    assert_eq!(column.array_type(), ArrayType::Int);
    assert_eq!(column.values().collect::<Vec<_>>(), vec![Value::Int(7), Value::Int(0)]);
    assert_eq!(column.compute(Max::new()).unwrap(), 7.0);

    let doubles = column.doubles().unwrap();
    assert_eq!(doubles.clone().count(), 2);
    assert_eq!(doubles.sum::<f64>(), 7.0);

    assert!(table.column_at(2).is_err());
    assert_eq!(table.column_at(0).unwrap().key(), &"A");
}

#[test]
fn test_boolean_column_cannot_feed_statistics() {
    let mut builder = TableBuilder::new();
    builder.put_boolean(1, "flag", true);
    let table = builder.build();
    assert!(matches!(
        table.column(&"flag").unwrap().mean(),
        Err(FrameError::TypeMismatch { .. })
    ));
}

#[test]
fn test_row_view() {
    let table = sample_table();
    let row = table.row(&"r1").unwrap();
    assert_eq!(row.key(), &"r1");
    assert_eq!(row.ordinal(), 0);
    assert_eq!(row.get_double(&"A").unwrap(), 1.0);
    assert_eq!(row.get_int(&"B").unwrap(), 7);
    assert_eq!(row.values().collect::<Vec<_>>(), vec![Value::Double(1.0), Value::Int(7)]);

    let keys: Vec<_> = table.rows_iter().map(|row| *row.key()).collect();
    assert_eq!(keys, vec!["r1", "r2"]);
    assert!(table.row_at(2).is_err());
    assert!(matches!(table.row(&"nope"), Err(FrameError::KeyNotFound(_))));
}

#[test]
fn test_select_rows() {
    let table = Table::of_doubles(0..10, ["v"], |row, _| *row as f64).unwrap();
    let view = table.select_rows(|row| row.get_double(&"v").unwrap() >= 7.0);

    assert_eq!(view.row_count(), 3);
    assert_eq!(view.ordinals(), &[7, 8, 9]);
    assert_eq!(view.row_keys().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    assert_eq!(view.column(&"v").unwrap().sum().unwrap(), 24.0);
    assert_eq!(view.get_double(0, &"v").unwrap(), 7.0);
    assert!(view.row(3).is_err());

    let copy = view.to_table();
    assert_eq!(copy.row_count(), 3);
    assert_eq!(copy.get_double(&8, &"v").unwrap(), 8.0);
    assert_eq!(copy.rows().coordinate(&8).unwrap(), 1);
}

#[test]
fn test_group_by() {
    let mut builder = TableBuilder::new();
    let cities = ["Paris", "Rome", "Paris", "Oslo", "Rome", "Paris"];
    for (i, city) in cities.iter().enumerate() {
        builder
            .put_value(i, "city", *city)
            .put_double(i, "temp", (i * 10) as f64);
    }
    let table = builder.build();

    let groups = table.group_by(&"city").unwrap();
    assert_eq!(groups.key(), &"city");
    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups.keys().cloned().collect::<Vec<_>>(),
        vec![Value::from("Paris"), Value::from("Rome"), Value::from("Oslo")]
    );

    let paris = groups.get(&Value::from("Paris")).unwrap();
    assert_eq!(paris.ordinals(), &[0, 2, 5]);
    let paris_mean = paris.column(&"temp").unwrap().mean().unwrap();
    assert!((paris_mean - 70.0 / 3.0).abs() < 1e-9);

    let means = groups.compute(&"temp", Mean::new()).unwrap();
    assert_eq!(means.row_count(), 3);
    assert_eq!(means.get_double(&Value::from("Rome"), &"temp").unwrap(), 25.0);
    assert_eq!(means.get_double(&Value::from("Oslo"), &"temp").unwrap(), 30.0);

    let total: usize = groups.iter().map(|(_, view)| view.row_count()).sum();
    assert_eq!(total, table.row_count());
    assert!(table.group_by(&"absent").is_err());
}

#[test]
fn test_group_by_numeric_column() {
    let table = Table::of_doubles(0..6, ["bucket"], |row, _| (*row % 2) as f64).unwrap();
    let groups = table.group_by(&"bucket").unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.get(&Value::Double(1.0)).unwrap().ordinals(), &[1, 3, 5]);
}

#[test]
fn test_parallel_reads_of_built_table() {
    let table =
        Arc::new(Table::of_doubles(0..1000, 0..8, |row, col| (*row * (*col + 1)) as f64).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|col| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let mut mean = Mean::new();
                mean.add_all(table.column(&col).unwrap().doubles().unwrap());
                mean.value()
            })
        })
        .collect();

    for (col, handle) in handles.into_iter().enumerate() {
        let mean = handle.join().unwrap();
        assert!((mean - 499.5 * (col + 1) as f64).abs() < 1e-9);
    }
}

proptest! {
    #[test]
    fn prop_round_trip(cells in proptest::collection::vec((0u8..20, 0u8..4, -1000i64..1000), 0..200)) {
        let mut builder = TableBuilder::new();
        for (row, col, value) in &cells {
            match col {
                0 => builder.put_long(*row, *col, *value),
                1 => builder.put_double(*row, *col, *value as f64 / 4.0),
                2 => builder.put_boolean(*row, *col, value % 2 == 0),
                _ => builder.put_value(*row, *col, format!("{}", value)),
            };
        }
        let table = builder.build();
        let copy = TableBuilder::from_table(&table).build();
        prop_assert_eq!(copy, table);
    }
}
