//! JSON descriptions of the HTML-free forms served on GET routes

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub required: bool,
}

/// What a client must POST, and where
#[derive(Serialize, Debug, Clone)]
pub struct FormDescriptor {
    pub form: &'static str,
    pub action: &'static str,
    pub method: &'static str,
    pub encoding: &'static str,
    pub fields: Vec<FormField>,
}

impl FormDescriptor {
    pub fn post(form: &'static str, action: &'static str) -> Self {
        Self {
            form,
            action,
            method: "POST",
            encoding: "application/x-www-form-urlencoded",
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, label: &'static str, input_type: &'static str) -> Self {
        self.fields.push(FormField {
            name,
            label,
            input_type,
            required: true,
        });
        self
    }

    pub fn optional_field(
        mut self,
        name: &'static str,
        label: &'static str,
        input_type: &'static str,
    ) -> Self {
        self.fields.push(FormField {
            name,
            label,
            input_type,
            required: false,
        });
        self
    }
}
