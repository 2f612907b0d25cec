//! String-keyed configuration values

/// Named option with a description and an optional raw value
///
/// A parameter counts as set once it carries a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    description: String,
    value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Ordered collection of parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `(name, value)` pairs into a set where every parameter is set
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (name, value) in pairs {
            set.set(name, value);
        }
        set
    }

    /// Make a parameter known without assigning it; keeps an existing value
    pub fn declare(&mut self, name: impl Into<String>, description: impl Into<String>) -> &mut Self {
        let name = name.into();
        let description = description.into();
        match self.position(&name) {
            Some(i) => self.parameters[i].description = description,
            None => self.parameters.push(Parameter::new(name, description)),
        }
        self
    }

    /// Assign a raw value, declaring the parameter if needed
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let i = match self.position(&name) {
            Some(i) => i,
            None => {
                self.parameters.push(Parameter::new(name, String::new()));
                self.parameters.len() - 1
            }
        };
        self.parameters[i].value = Some(value.into());
        self
    }

    /// Remove the value of a parameter, keeping its declaration
    pub fn unset(&mut self, name: &str) -> &mut Self {
        if let Some(i) = self.position(name) {
            self.parameters[i].value = None;
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Parameter::value)
    }

    /// Whether `name` is currently assigned a value; unknown names are unset
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(Parameter::is_set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }
}
