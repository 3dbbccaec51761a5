/// The nearest open place of the requested category, after the details
/// lookup has filled in its contact fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub category: String,
    pub name: String,
    pub formatted_address: String,
    pub phone: Option<String>,
}
