//! End-to-end generation from XSD text and hand-built trees.

use xsdgo_codegen::{
    CodegenError, ConflictPolicy, Generator, GeneratorConfig, generate, generate_from_file,
    generate_from_xsd,
};
use xsdgo_schema::{SchemaNode, SchemaTree};

const ORDER_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="order">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="line-item" type="LineItem" maxOccurs="unbounded"/>
                <xs:element name="customer_name" type="xs:string"/>
                <xs:element name="placed-at" type="xs:dateTime"/>
                <xs:element name="note" minOccurs="0">
                    <xs:complexType>
                        <xs:simpleContent>
                            <xs:extension base="xs:string">
                                <xs:attribute name="lang" type="xs:language"/>
                            </xs:extension>
                        </xs:simpleContent>
                    </xs:complexType>
                </xs:element>
            </xs:sequence>
            <xs:attribute name="id" type="xs:int"/>
            <xs:attribute name="api-url" type="xs:anyURI"/>
        </xs:complexType>
    </xs:element>
    <xs:complexType name="LineItem">
        <xs:sequence>
            <xs:element name="sku" type="xs:string"/>
            <xs:element name="qty" type="xs:positiveInteger"/>
            <xs:element name="price" type="xs:decimal"/>
        </xs:sequence>
        <xs:attribute name="gift" type="xs:boolean"/>
    </xs:complexType>
</xs:schema>"#;

const ORDER_GO: &str = "// Code generated by xsdgo. DO NOT EDIT.

package orders

// Order is generated from an XSD element
type Order struct {
\tID int `xml:\"id,attr\"`
\tAPIURL string `xml:\"api-url,attr\"`
\tLineItem []LineItem `xml:\"line-item\"`
\tCustomerName string `xml:\"customer_name\"`
\tPlacedAt time.Time `xml:\"placed-at\"`
\tNote Note `xml:\"note\"`
}

// LineItem is generated from an XSD element
type LineItem struct {
\tGift bool `xml:\"gift,attr\"`
\tSku string `xml:\"sku\"`
\tQty int `xml:\"qty\"`
\tPrice float64 `xml:\"price\"`
}

// Note is generated from an XSD element
type Note struct {
\tLang string `xml:\"lang,attr\"`
\tNote string `xml:\",chardata\"`
}

";

#[test]
fn test_generate_from_xsd() {
    let config = GeneratorConfig::new().package("orders").exported(true);
    let output = generate_from_xsd(ORDER_XSD, &config).expect("generation failed");
    assert_eq!(output, ORDER_GO);
}

#[test]
fn test_generate_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("order.xsd");
    std::fs::write(&path, ORDER_XSD).expect("write");

    let config = GeneratorConfig::new().package("orders").exported(true);
    let output = generate_from_file(&path, &config).expect("generation failed");
    assert_eq!(output, ORDER_GO);
}

#[test]
fn test_generate_from_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = generate_from_file(&dir.path().join("missing.xsd"), &GeneratorConfig::new())
        .unwrap_err();
    assert!(matches!(err, CodegenError::Io(_)));
}

#[test]
fn test_parse_error_is_surfaced() {
    let err = generate_from_xsd("<xs:schema", &GeneratorConfig::new()).unwrap_err();
    assert!(matches!(err, CodegenError::Parse(_)));
}

#[test]
fn test_order_tree_example() {
    let mut tree = SchemaTree::new();
    let order = tree.add_root(SchemaNode::new("Order", "Order").with_attribute("id", "int"));
    let item = tree.add_node(SchemaNode::new("line-item", "LineItem"));
    tree.add_child(order, item, true);

    let config = GeneratorConfig::new().exported(true);
    let declarations = Generator::new(&tree, &config)
        .declarations()
        .expect("generation failed");

    let names: Vec<&str> = declarations.iter().map(|d| d.type_name.as_str()).collect();
    assert_eq!(names, vec!["Order", "LineItem"]);
    assert!(declarations[0].source.contains("\tID int `xml:\"id,attr\"`\n"));
    assert!(
        declarations[0]
            .source
            .contains("\tLineItem []LineItem `xml:\"line-item\"`\n")
    );
}

#[test]
fn test_prefix_and_fragment_mode() {
    let mut tree = SchemaTree::new();
    let root = tree.add_root(SchemaNode::new("order", "order"));
    let item = tree.add_node(SchemaNode::new("item", "item"));
    tree.add_child(root, item, false);

    let config = GeneratorConfig::new().prefix("wire");
    let output = generate(&tree, &config).expect("generation failed");

    assert!(output.starts_with("// wireOrder is generated from an XSD element\n"));
    assert!(output.contains("\tItem wireItem `xml:\"item\"`\n"));
    assert!(output.contains("type wireItem struct {"));
}

#[test]
fn test_recursive_schema_is_rejected() {
    let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:complexType name="Folder">
        <xs:sequence>
            <xs:element name="folder" type="Folder" maxOccurs="unbounded"/>
        </xs:sequence>
    </xs:complexType>
    <xs:element name="root" type="Folder"/>
</xs:schema>"#;

    let err = generate_from_xsd(xsd, &GeneratorConfig::new()).unwrap_err();
    match err {
        CodegenError::CyclicSchema { path } => assert_eq!(path, "folder -> folder"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_recursive_schema_with_matching_root_name_is_rejected() {
    let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:complexType name="Folder">
        <xs:sequence>
            <xs:element name="folder" type="Folder" maxOccurs="unbounded"/>
        </xs:sequence>
    </xs:complexType>
    <xs:element name="folder" type="Folder"/>
</xs:schema>"#;

    let err = generate_from_xsd(xsd, &GeneratorConfig::new()).unwrap_err();
    match err {
        CodegenError::CyclicSchema { path } => assert_eq!(path, "folder -> folder"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_reject_policy_from_xsd() {
    let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="a">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="item">
                    <xs:complexType>
                        <xs:attribute name="x" type="xs:int"/>
                    </xs:complexType>
                </xs:element>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
    <xs:element name="b">
        <xs:complexType>
            <xs:sequence>
                <xs:element name="item">
                    <xs:complexType>
                        <xs:attribute name="y" type="xs:string"/>
                    </xs:complexType>
                </xs:element>
            </xs:sequence>
        </xs:complexType>
    </xs:element>
</xs:schema>"#;

    let keep = generate_from_xsd(xsd, &GeneratorConfig::new()).expect("generation failed");
    assert_eq!(keep.matches("type item struct").count(), 1);
    assert!(keep.contains("`xml:\"x,attr\"`"));

    let reject = GeneratorConfig::new().conflict_policy(ConflictPolicy::Reject);
    let err = generate_from_xsd(xsd, &reject).unwrap_err();
    assert!(matches!(err, CodegenError::ConflictingDefinition { .. }));
}
