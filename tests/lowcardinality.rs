use chcol::block::{BlockWriter, SelectCursor};
use chcol::column::{
    Append, Array, Column, FixedColumn, FixedString, LowCardinality, Primitive, ReadAll,
};

const ROWS: usize = 10;

/// The four LowCardinality shapes of one element type.
struct Columns<T: Primitive> {
    lc: LowCardinality<FixedColumn<T>>,
    lc_nullable: LowCardinality<FixedColumn<T>>,
    lc_array: Array<LowCardinality<FixedColumn<T>>>,
    lc_array_nullable: Array<LowCardinality<FixedColumn<T>>>,
}

impl<T: Primitive> Columns<T> {
    fn new() -> Self {
        Self {
            lc: LowCardinality::new(FixedColumn::new()),
            lc_nullable: LowCardinality::nullable(FixedColumn::new()),
            lc_array: Array::new(LowCardinality::new(FixedColumn::new())),
            lc_array_nullable: Array::new(LowCardinality::nullable(FixedColumn::new())),
        }
    }

    fn all(&mut self) -> [(&'static str, &mut dyn Column); 4] {
        [
            ("lc", &mut self.lc as &mut dyn Column),
            ("lc_nullable", &mut self.lc_nullable as &mut dyn Column),
            ("lc_array", &mut self.lc_array as &mut dyn Column),
            ("lc_array_nullable", &mut self.lc_array_nullable as &mut dyn Column),
        ]
    }
}

#[derive(Debug, Default, PartialEq)]
struct Rows<T> {
    plain: Vec<T>,
    nullable: Vec<Option<T>>,
    array: Vec<Vec<T>>,
    array_nullable: Vec<Vec<Option<T>>>,
}

/// Insert `ROWS` rows where row `i` (from 1) holds `first(i)`, its array
/// holds `[first(i), second(i)]` and its nullable array `[first(i), null]`.
/// Even rows of the nullable column hold a value, odd rows are null.
fn write_scenario<T: Primitive + Copy>(
    first: impl Fn(usize) -> T,
    second: impl Fn(usize) -> T,
) -> (Vec<u8>, Rows<T>) {
    let mut cols = Columns::<T>::new();
    let mut inserted = Rows::default();
    for i in 1..=ROWS {
        let val = first(i);
        cols.lc.append(val);
        inserted.plain.push(val);

        let array = vec![val, second(i)];
        cols.lc_array.append_len(array.len());
        for &v in &array {
            cols.lc_array.inner_mut().append(v);
        }
        inserted.array.push(array);

        let array_nullable = vec![Some(val), None];
        cols.lc_array_nullable.append_len(array_nullable.len());
        for &v in &array_nullable {
            cols.lc_array_nullable.inner_mut().append_option(v);
        }
        inserted.array_nullable.push(array_nullable);

        if i % 2 == 0 {
            cols.lc_nullable.append_option(Some(val));
            inserted.nullable.push(Some(val));
        } else {
            cols.lc_nullable.append_null();
            inserted.nullable.push(None);
        }
    }

    let mut writer = BlockWriter::new();
    writer.insert(&mut cols.all()).unwrap();
    (writer.into_bytes(), inserted)
}

/// Decode with bulk `read_all` and `fill`.
fn read_all_scenario<T: Primitive + Copy>(data: &[u8]) -> Rows<T> {
    let mut cols = Columns::<T>::new();
    let mut rows = Rows::default();
    let mut cursor = SelectCursor::new(data);
    while cursor.next_block() {
        cursor.read_columns(&mut cols.all().map(|(_, c)| c)).unwrap();

        let mut dict: Vec<T> = Vec::new();
        let mut keys: Vec<usize> = Vec::new();
        cols.lc.dictionary().read_all(&mut dict);
        cols.lc.read_all(&mut keys);
        rows.plain.extend(keys.iter().map(|&k| dict[k]));

        dict.clear();
        keys.clear();
        cols.lc_nullable.dictionary().read_all(&mut dict);
        cols.lc_nullable.read_all(&mut keys);
        // key 0 means null
        rows.nullable
            .extend(keys.iter().map(|&k| (k != 0).then(|| dict[k])));

        let mut lens: Vec<usize> = Vec::new();
        dict.clear();
        cols.lc_array.read_all(&mut lens);
        cols.lc_array.inner().dictionary().read_all(&mut dict);
        for &len in &lens {
            let mut run = vec![0usize; len];
            cols.lc_array.inner_mut().fill(&mut run).unwrap();
            rows.array.push(run.iter().map(|&k| dict[k]).collect());
        }

        lens.clear();
        dict.clear();
        cols.lc_array_nullable.read_all(&mut lens);
        cols.lc_array_nullable.inner().dictionary().read_all(&mut dict);
        for &len in &lens {
            let mut run = vec![0usize; len];
            cols.lc_array_nullable.inner_mut().fill(&mut run).unwrap();
            rows.array_nullable
                .push(run.iter().map(|&k| (k != 0).then(|| dict[k])).collect());
        }
    }
    assert!(cursor.err().is_none(), "{:?}", cursor.err());
    rows
}

/// Decode row by row with `next`/`value` and dictionary lookups.
fn read_one_by_one_scenario<T: Primitive + Copy>(data: &[u8]) -> Rows<T> {
    let mut cols = Columns::<T>::new();
    let mut rows = Rows::default();
    let mut cursor = SelectCursor::new(data);
    while cursor.next_block() {
        cursor.next_column(&mut cols.lc).unwrap();
        while cols.lc.next() {
            let key = cols.lc.value();
            rows.plain.push(cols.lc.dictionary().value(key).unwrap());
        }

        cursor.next_column(&mut cols.lc_nullable).unwrap();
        while cols.lc_nullable.next() {
            let key = cols.lc_nullable.value();
            rows.nullable
                .push((key != 0).then(|| cols.lc_nullable.dictionary().value(key).unwrap()));
        }

        cursor.next_column(&mut cols.lc_array).unwrap();
        let mut lens: Vec<usize> = Vec::new();
        cols.lc_array.read_all(&mut lens);
        for len in lens {
            let lc = cols.lc_array.inner_mut();
            let row = (0..len)
                .map(|_| {
                    assert!(lc.next());
                    lc.dictionary().value(lc.value()).unwrap()
                })
                .collect();
            rows.array.push(row);
        }

        cursor.next_column(&mut cols.lc_array_nullable).unwrap();
        let mut lens: Vec<usize> = Vec::new();
        cols.lc_array_nullable.read_all(&mut lens);
        for len in lens {
            let lc = cols.lc_array_nullable.inner_mut();
            let row = (0..len)
                .map(|_| {
                    assert!(lc.next());
                    let key = lc.value();
                    (key != 0).then(|| lc.dictionary().value(key).unwrap())
                })
                .collect();
            rows.array_nullable.push(row);
        }
    }
    assert!(cursor.err().is_none(), "{:?}", cursor.err());
    rows
}

#[test]
fn test_uint8_low_cardinality() {
    let (data, inserted) = write_scenario(|i| i as u8, |i| i as u8 + 1);
    assert_eq!(read_all_scenario::<u8>(&data), inserted);
    assert_eq!(read_one_by_one_scenario::<u8>(&data), inserted);
}

#[test]
fn test_float32_low_cardinality() {
    let (data, inserted) = write_scenario(|i| (i as f32) * -4.0, |i| (i as f32) * -4.0 + 1.0);
    assert_eq!(inserted.array[2], vec![-12.0, -11.0]);
    assert_eq!(read_all_scenario::<f32>(&data), inserted);
    assert_eq!(read_one_by_one_scenario::<f32>(&data), inserted);
}

#[test]
fn test_column_type_names() {
    let mut cols = Columns::<f32>::new();
    let names: Vec<String> = cols.all().iter().map(|(_, c)| c.type_name()).collect();
    assert_eq!(
        names,
        vec![
            "LowCardinality(Float32)",
            "LowCardinality(Nullable(Float32))",
            "Array(LowCardinality(Float32))",
            "Array(LowCardinality(Nullable(Float32)))",
        ]
    );
}

#[test]
fn test_fixed_string_low_cardinality() {
    let mut col = LowCardinality::nullable(FixedString::new(10));
    let mut inserted: Vec<Option<Vec<u8>>> = Vec::new();
    for i in 1..=ROWS {
        if i % 2 == 0 {
            let val = format!("{:10}", i).into_bytes();
            col.append(val.as_slice());
            inserted.push(Some(val));
        } else {
            col.append_null();
            inserted.push(None);
        }
    }
    let mut writer = BlockWriter::new();
    writer.insert(&mut [("name", &mut col as &mut dyn Column)]).unwrap();
    let data = writer.into_bytes();

    let mut read = LowCardinality::nullable(FixedString::new(10));
    let mut cursor = SelectCursor::new(&data);
    assert!(cursor.next_block());
    assert_eq!(
        cursor.peek_column().unwrap(),
        ("name", "LowCardinality(Nullable(FixedString(10)))")
    );
    cursor.next_column(&mut read).unwrap();

    let mut dict: Vec<Vec<u8>> = Vec::new();
    let mut keys: Vec<usize> = Vec::new();
    read.dictionary().read_all(&mut dict);
    read.read_all(&mut keys);
    // every null row points at slot 0, no value does
    for (row, &k) in keys.iter().enumerate() {
        assert_eq!(k == 0, inserted[row].is_none(), "row {row}");
    }
    let decoded: Vec<Option<Vec<u8>>> = keys
        .iter()
        .map(|&k| (k != 0).then(|| dict[k].clone()))
        .collect();
    assert_eq!(decoded, inserted);

    let mut one_by_one: Vec<Option<Vec<u8>>> = Vec::new();
    while read.next() {
        let k = read.value();
        one_by_one.push((k != 0).then(|| read.dictionary().value(k).unwrap().to_vec()));
    }
    assert_eq!(one_by_one, inserted);
    assert!(!cursor.next_block());
    assert!(cursor.err().is_none());
}

#[test]
fn test_width_upgrade_through_block() {
    let mut col = LowCardinality::new(FixedColumn::<u32>::new());
    for v in 0..1000u32 {
        col.append(v % 300);
    }
    let mut writer = BlockWriter::new();
    writer.insert(&mut [("v", &mut col as &mut dyn Column)]).unwrap();
    let data = writer.into_bytes();

    let mut read = LowCardinality::new(FixedColumn::<u32>::new());
    let mut cursor = SelectCursor::new(&data);
    assert!(cursor.next_block());
    cursor.next_column(&mut read).unwrap();
    assert_eq!(read.key_width(), chcol::column::KeyWidth::U16);
    assert_eq!(read.dictionary().rows(), 301);

    let mut dict: Vec<u32> = Vec::new();
    let mut keys: Vec<usize> = Vec::new();
    read.dictionary().read_all(&mut dict);
    read.read_all(&mut keys);
    let values: Vec<u32> = keys.iter().map(|&k| dict[k]).collect();
    assert_eq!(values, (0..1000u32).map(|v| v % 300).collect::<Vec<_>>());
}
