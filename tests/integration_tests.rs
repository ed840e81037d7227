use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_properties::{
    from_properties, from_slice, from_str, from_str_keyed, from_str_with_options, properties,
    to_properties, to_string, to_string_with_options, Error, Properties, PropertiesOptions,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Item {
    #[serde(rename = "sa1")]
    label: String,
    #[serde(rename = "ia1")]
    count: i64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Everything {
    #[serde(rename = "s1")]
    text: String,
    i1: i64,
    i2: i8,
    i3: i16,
    i4: i32,
    i5: i64,
    ui1: u64,
    ui2: u8,
    ui3: u16,
    ui4: u32,
    ui5: u64,
    f1: f32,
    f2: f64,
    b1: bool,
    b2: bool,
    slice1: Vec<i32>,
    slice2: Vec<Option<Item>>,
    map1: BTreeMap<String, String>,
    map2: BTreeMap<String, Option<Item>>,
    pt1: Option<Item>,
    #[serde(rename = "st1")]
    inner: Item,
    time: DateTime<Utc>,
}

fn item(label: &str, count: i64) -> Item {
    Item {
        label: label.to_string(),
        count,
    }
}

fn everything() -> Everything {
    let mut map1 = BTreeMap::new();
    map1.insert("a".to_string(), "haha".to_string());
    let mut map2 = BTreeMap::new();
    map2.insert("a".to_string(), Some(item("hello", 1)));

    Everything {
        text: "hello world".to_string(),
        i1: 1,
        i2: 2,
        i3: 4,
        i4: 8,
        i5: 16,
        ui1: 1,
        ui2: 2,
        ui3: 4,
        ui4: 8,
        ui5: 16,
        f1: 3.1415,
        f2: 2.7187,
        b1: true,
        b2: false,
        slice1: vec![1, 2, 3, 4],
        slice2: vec![Some(item("hello", 1)), Some(item("world", 2))],
        map1,
        map2,
        pt1: Some(item("byebye", 3)),
        inner: item("morning", 4),
        time: Utc
            .with_ymd_and_hms(2021, 8, 30, 11, 11, 11)
            .unwrap()
            .with_nanosecond(11)
            .unwrap(),
    }
}

#[test]
fn test_encode_every_shape() {
    let expected = [
        "s1=hello world",
        "i1=1",
        "i2=2",
        "i3=4",
        "i4=8",
        "i5=16",
        "ui1=1",
        "ui2=2",
        "ui3=4",
        "ui4=8",
        "ui5=16",
        "f1=3.1415",
        "f2=2.7187",
        "b1=true",
        "b2=false",
        "slice1[0]=1",
        "slice1[1]=2",
        "slice1[2]=3",
        "slice1[3]=4",
        "slice2[0].sa1=hello",
        "slice2[0].ia1=1",
        "slice2[1].sa1=world",
        "slice2[1].ia1=2",
        "map1.a=haha",
        "map2.a.sa1=hello",
        "map2.a.ia1=1",
        "pt1.sa1=byebye",
        "pt1.ia1=3",
        "st1.sa1=morning",
        "st1.ia1=4",
        "time=2021-08-30T11:11:11.000000011Z",
    ];
    let expected: String = expected.iter().map(|line| format!("{}\n", line)).collect();

    assert_eq!(to_string(&everything()).unwrap(), expected);
}

#[test]
fn test_every_shape_round_trips() {
    let value = everything();
    let text = to_string(&value).unwrap();
    let back: Everything = from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_encode_map() {
    let mut m = HashMap::new();
    m.insert("a", "hello");
    m.insert("b", "world");

    let text = to_string(&m).unwrap();
    assert!(text == "a=hello\nb=world\n" || text == "b=world\na=hello\n");

    let sorted = to_string_with_options(&m, PropertiesOptions::new().with_sorted_keys()).unwrap();
    assert_eq!(sorted, "a=hello\nb=world\n");
}

#[test]
fn test_encode_map_with_structured_keys() {
    let mut m = BTreeMap::new();
    m.insert("dailystudy.leveltext[0].level", "100000");
    m.insert("dailystudy.leveltext[0].ls", "BR-100L");
    m.insert("dailystudy.leveltext[0].title", "完成Level A的学习，孩子可以");

    let props = to_properties(&m).unwrap();
    assert_eq!(props.len(), 3);
    assert_eq!(props.get("dailystudy.leveltext[0].ls"), Some("BR-100L"));
    assert_eq!(
        props.get("dailystudy.leveltext[0].title"),
        Some("完成Level A的学习，孩子可以")
    );
}

#[derive(Deserialize, Debug, PartialEq)]
struct Integers {
    a: i64,
    b: i8,
    c: i16,
    d: i32,
    e: i64,
    f: u64,
    g: u8,
    h: u16,
    i: u32,
    j: u64,
    k: i64,
}

#[test]
fn test_decode_integers() {
    let props = properties! {
        "a" => "-1", "b" => "2", "c" => "512", "d" => "1024", "e" => "4096",
        "f" => "0", "g" => "2", "h" => "4", "i" => "8", "j" => "16",
    };
    let given: Integers = from_properties(&props).unwrap();
    assert_eq!(
        given,
        Integers { a: -1, b: 2, c: 512, d: 1024, e: 4096, f: 0, g: 2, h: 4, i: 8, j: 16, k: 0 }
    );
}

#[test]
fn test_decode_missing_string_is_empty() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: String,
        b: String,
    }

    let given: S = from_properties(&properties! { "a" => "hello" }).unwrap();
    assert_eq!(given, S { a: "hello".to_string(), b: String::new() });
}

#[test]
fn test_decode_floats() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: f32,
        b: f64,
        c: f32,
        d: f32,
    }

    let props = properties! { "a" => "3.1415", "b" => "2.7187", "c" => "0" };
    let given: S = from_properties(&props).unwrap();
    assert_eq!(given, S { a: 3.1415, b: 2.7187, c: 0.0, d: 0.0 });
}

#[test]
fn test_decode_bools() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: bool,
        b: bool,
        c: bool,
    }

    let given: S = from_properties(&properties! { "a" => "true", "b" => "0" }).unwrap();
    assert_eq!(given, S { a: true, b: false, c: false });

    for literal in ["1", "t", "T", "TRUE", "true", "True"] {
        let given: S = from_properties(&properties! { "a" => literal }).unwrap();
        assert!(given.a, "{} should be true", literal);
    }

    let err = from_properties::<S>(&properties! { "c" => "yes" }).unwrap_err();
    assert_eq!(err, Error::conversion("c", "yes", "bool"));
}

#[test]
fn test_decode_maps() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: HashMap<String, String>,
        b: HashMap<String, i32>,
        c: HashMap<String, f64>,
        d: HashMap<String, String>,
    }

    let props = properties! {
        "a.a" => "hello", "a.b" => "world",
        "b.a" => "1", "b.b" => "2",
        "c.a" => "3.1415", "c.b" => "2.7187",
    };
    let given: S = from_properties(&props).unwrap();

    assert_eq!(given.a.len(), 2);
    assert_eq!(given.a["a"], "hello");
    assert_eq!(given.a["b"], "world");
    assert_eq!(given.b["a"], 1);
    assert_eq!(given.b["b"], 2);
    assert_eq!(given.c["a"], 3.1415);
    assert_eq!(given.c["b"], 2.7187);
    assert!(given.d.is_empty());
}

#[test]
fn test_decode_sequences() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: Vec<String>,
        b: Vec<i32>,
        c: Vec<bool>,
    }

    let mut props = properties! { "a[0]" => "hello", "a[1]" => "world" };
    for i in 0..8 {
        props.insert(format!("b[{}]", i), (i + 1).to_string());
    }

    let given: S = from_properties(&props).unwrap();
    assert_eq!(given.a, vec!["hello", "world"]);
    assert_eq!(given.b, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(given.c.is_empty());
}

#[test]
fn test_decode_sparse_sequence_stops_at_gap() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        b: Vec<i32>,
    }

    let given: S = from_properties(&properties! { "b[0]" => "1", "b[2]" => "2" }).unwrap();
    assert_eq!(given.b, vec![1]);

    let given: S = from_properties(&properties! { "b[1]" => "2" }).unwrap();
    assert!(given.b.is_empty());
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct First {
    a: String,
    b: i32,
}

#[derive(Deserialize, Debug, PartialEq)]
struct Second {
    a: bool,
    b: String,
}

fn nested_props() -> Properties {
    properties! { "a.a" => "hello", "a.b" => "3", "b.a" => "true", "b.b" => "world" }
}

#[test]
fn test_decode_nested_structs() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: First,
        b: Second,
    }

    let given: S = from_properties(&nested_props()).unwrap();
    assert_eq!(given.a, First { a: "hello".to_string(), b: 3 });
    assert_eq!(given.b, Second { a: true, b: "world".to_string() });
}

#[test]
fn test_decode_optional_structs() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        a: Option<First>,
        b: Option<Second>,
        c: Option<First>,
    }

    let given: S = from_properties(&nested_props()).unwrap();
    assert_eq!(given.a, Some(First { a: "hello".to_string(), b: 3 }));
    assert_eq!(given.b, Some(Second { a: true, b: "world".to_string() }));
    assert_eq!(given.c, None);
}

#[test]
fn test_decode_sequence_of_structs() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        #[serde(rename = "as")]
        plain: Vec<First>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct P {
        #[serde(rename = "as")]
        optional: Vec<Option<First>>,
    }

    let props = properties! {
        "as[0].a" => "hello", "as[0].b" => "1",
        "as[1].a" => "world", "as[1].b" => "2",
    };

    let given: S = from_properties(&props).unwrap();
    assert_eq!(
        given.plain,
        vec![
            First { a: "hello".to_string(), b: 1 },
            First { a: "world".to_string(), b: 2 },
        ]
    );

    let given: P = from_properties(&props).unwrap();
    assert_eq!(
        given.optional,
        vec![
            Some(First { a: "hello".to_string(), b: 1 }),
            Some(First { a: "world".to_string(), b: 2 }),
        ]
    );
}

#[test]
fn test_decode_struct_valued_maps() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Entry {
        pa: String,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct S {
        m: HashMap<String, Entry>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct P {
        m: HashMap<String, Option<Entry>>,
    }

    let props = properties! { "m.k1.pa" => "pa1", "m.k2.pa" => "pa2" };

    let given: S = from_properties(&props).unwrap();
    assert_eq!(given.m.len(), 2);
    assert_eq!(given.m["k1"], Entry { pa: "pa1".to_string() });
    assert_eq!(given.m["k2"], Entry { pa: "pa2".to_string() });

    let given: P = from_properties(&props).unwrap();
    assert_eq!(given.m["k1"], Some(Entry { pa: "pa1".to_string() }));
    assert_eq!(given.m["k2"], Some(Entry { pa: "pa2".to_string() }));
}

#[test]
fn test_skipped_fields() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Account {
        user: String,
        #[serde(skip)]
        password: String,
    }

    let account = Account {
        user: "alice".to_string(),
        password: "hunter2".to_string(),
    };
    assert_eq!(to_string(&account).unwrap(), "user=alice\n");

    let given: Account = from_str("user=bob\npassword=secret\n").unwrap();
    assert_eq!(given, Account { user: "bob".to_string(), password: String::new() });
}

#[test]
fn test_none_is_omitted() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct S {
        name: Option<String>,
        first: Option<First>,
        values: Vec<Option<i32>>,
    }

    let s = S { name: None, first: None, values: vec![Some(1), None, Some(3)] };
    assert_eq!(to_string(&s).unwrap(), "values[0]=1\nvalues[2]=3\n");
}

#[test]
fn test_keyed_decoding() {
    let input = "
        a.a=hello
        a.b=1
        a=bye
        b=2
    ";
    let given: First = from_str_keyed("a", input).unwrap();
    assert_eq!(given, First { a: "hello".to_string(), b: 1 });
}

#[test]
fn test_scanning_from_text() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Row {
        a: i32,
        b: i32,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Doc {
        a: HashMap<String, String>,
        b: Vec<Row>,
        c: f64,
        d: f64,
        e: String,
    }

    let input = r#"
        # comment 1
        a.a=hello
        a.b=world

        # comment 2
        b[0].a=1
        b[0].b=2
        c=3.1415
        d=2.7187
        e={"a": 3, "b": "ha=ha=haha"}
    "#;

    let doc: Doc = from_str(input).unwrap();
    assert_eq!(doc.a["b"], "world");
    assert_eq!(doc.b, vec![Row { a: 1, b: 2 }]);
    assert_eq!(doc.c, 3.1415);
    assert_eq!(doc.d, 2.7187);
    assert_eq!(doc.e, r#"{"a": 3, "b": "ha=ha=haha"}"#);
}

#[test]
fn test_malformed_input() {
    let result: Result<First, _> = from_str("a=hello\nb\n");
    assert_eq!(result.unwrap_err(), Error::malformed_input(2, "b"));
}

#[test]
fn test_conversion_error_carries_key_path() {
    #[derive(Deserialize, Debug)]
    struct Port {
        #[allow(dead_code)]
        number: u16,
    }

    #[derive(Deserialize, Debug)]
    struct S {
        #[allow(dead_code)]
        ports: Vec<Port>,
    }

    let err = from_str::<S>("ports[0].number=80\nports[1].number=http\n").unwrap_err();
    assert_eq!(err, Error::conversion("ports[1].number", "http", "u16"));
    assert_eq!(err.key(), Some("ports[1].number"));
}

#[test]
fn test_narrowing_is_checked() {
    #[derive(Deserialize, Debug)]
    struct S {
        #[allow(dead_code)]
        small: i8,
    }

    let err = from_str::<S>("small=300").unwrap_err();
    assert_eq!(err, Error::conversion("small", "300", "i8"));
}

#[test]
fn test_untyped_decoding() {
    let props = properties! {
        "name" => "demo",
        "server.port" => "8080",
        "tags[0]" => "a",
        "tags[1]" => "b",
    };
    let value: serde_json::Value = from_properties(&props).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "name": "demo",
            "server": { "port": "8080" },
            "tags": ["a", "b"],
        })
    );
}

#[test]
fn test_flattened_extras() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Config {
        name: String,
        #[serde(flatten)]
        extra: BTreeMap<String, String>,
    }

    let config: Config = from_str("name=demo\nregion=eu\nzone=b\n").unwrap();
    assert_eq!(config.name, "demo");
    assert_eq!(config.extra.get("region").map(String::as_str), Some("eu"));
    assert_eq!(config.extra.get("zone").map(String::as_str), Some("b"));
}

#[test]
fn test_flattened_typed_members_fail() {
    #[derive(Deserialize, Debug)]
    struct Db {
        #[allow(dead_code)]
        port: u16,
    }

    #[derive(Deserialize, Debug)]
    struct Config {
        #[allow(dead_code)]
        name: String,
        #[allow(dead_code)]
        #[serde(flatten)]
        db: Db,
    }

    let err = from_str::<Config>("name=x\nport=80\n").unwrap_err();
    assert!(matches!(err, Error::Custom(_)));
    assert!(err.to_string().contains("expected u16"));
}

#[test]
fn test_aliased_fields_are_rejected() {
    #[derive(Deserialize, Debug)]
    struct Server {
        #[allow(dead_code)]
        #[serde(alias = "port_number")]
        port: u16,
    }

    let err = from_str::<Server>("port=80\n").unwrap_err();
    assert_eq!(
        err,
        Error::Custom("duplicate field `port` (field aliases are not supported)".to_string())
    );
}

#[test]
fn test_encode_rejects_entries_that_cannot_be_read_back() {
    #[derive(Serialize)]
    struct Note {
        title: String,
        body: String,
    }

    let note = Note {
        title: "t".to_string(),
        body: "line1\nline2".to_string(),
    };
    let err = to_string(&note).unwrap_err();
    assert_eq!(err.key(), Some("body"));
    assert!(matches!(err, Error::UnsupportedType { .. }));

    let mut labels = BTreeMap::new();
    labels.insert("a=b".to_string(), "v".to_string());
    let mut outer = BTreeMap::new();
    outer.insert("labels", labels);
    let err = to_string(&outer).unwrap_err();
    assert_eq!(err.key(), Some("labels.a=b"));
    assert!(matches!(err, Error::UnsupportedType { .. }));
}

#[test]
fn test_top_level_option_round_trips() {
    let value = Some(item("x", 7));
    let text = to_string(&value).unwrap();
    let back: Option<Item> = from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_large_inputs_decode() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: u32,
        y: u32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Data {
        points: Vec<Point>,
        names: BTreeMap<String, u32>,
    }

    let data = Data {
        points: (0..20_000).map(|i| Point { x: i, y: i * 2 }).collect(),
        names: (0..20_000).map(|i| (format!("n{}", i), i)).collect(),
    };
    let props = to_properties(&data).unwrap();
    assert_eq!(props.len(), 60_000);
    let back: Data = from_properties(&props).unwrap();
    assert_eq!(back, data);
}

#[test]
fn test_options_round_trip() {
    let options = PropertiesOptions::new().with_root("app").with_comment('!');
    let value = item("x", 7);

    let text = to_string_with_options(&value, options.clone()).unwrap();
    assert_eq!(text, "app.sa1=x\napp.ia1=7\n");

    let input = format!("! generated\nother.sa1=y\n{}", text);
    let back: Item = from_str_with_options(&input, options).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_invalid_utf8() {
    let err = from_slice::<First>(b"a=\xff\n").unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8(_)));
}
