use geo_types::Polygon;

/// Declared type of an attribute field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
}

/// One column of the attribute schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub width: usize,
}

/// One attribute value. `Null` covers unset fields.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Real(f64),
    Text(String),
    Null,
}

/// An input polygon with its attribute values, in schema order.
#[derive(Clone, Debug)]
pub struct Feature {
    pub geometry: Polygon<f64>,
    pub values: Vec<FieldValue>,
}

/// An in-memory feature set: schema, spatial reference, and features.
///
/// The spatial reference is an opaque descriptor (e.g. WKT) carried through
/// to the output untouched. Reading and writing actual vector file formats
/// is up to the caller.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub srs: Option<String>,
    pub fields: Vec<Field>,
    pub features: Vec<Feature>,
}

impl Dataset {
    pub fn new(srs: Option<String>, fields: Vec<Field>) -> Self {
        Self {
            srs,
            fields,
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
