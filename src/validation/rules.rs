//! Rule sets for every request body the API accepts.

use super::{FieldType, Format, Mask, ValidationField};

const EMAIL: ValidationField = ValidationField::new("email")
    .of_type(FieldType::String)
    .required()
    .format(Format::Email)
    .mask(Mask::Lower);

const PASSWORD: ValidationField = ValidationField::new("password")
    .of_type(FieldType::String)
    .required()
    .format(Format::Password)
    .mask(Mask::Base64Decode);

pub const LOGIN: &[ValidationField] = &[EMAIL, PASSWORD];

pub const REGISTER: &[ValidationField] = &[
    EMAIL,
    ValidationField::new("name")
        .of_type(FieldType::String)
        .required()
        .format(Format::Name)
        .mask(Mask::Pascal),
    PASSWORD,
];

pub const CREATE_LABEL: &[ValidationField] = &[ValidationField::new("label")
    .of_type(FieldType::String)
    .required()
    .min(3.0)
    .max(15.0)
    .mask(Mask::Pascal)];

pub const CREATE_TASK: &[ValidationField] = &[
    ValidationField::new("title")
        .of_type(FieldType::String)
        .required()
        .mask(Mask::Pascal),
    ValidationField::new("description")
        .of_type(FieldType::String)
        .required(),
    ValidationField::new("dueDate")
        .of_type(FieldType::String)
        .required()
        .format(Format::Date),
    ValidationField::new("status")
        .of_type(FieldType::String)
        .required()
        .format(Format::TaskStatus),
    ValidationField::new("labels")
        .of_type(FieldType::Object)
        .required(),
];

pub const UPDATE_TASK: &[ValidationField] = &[
    ValidationField::new("id").of_type(FieldType::Number).required(),
    ValidationField::new("title")
        .of_type(FieldType::String)
        .mask(Mask::Pascal),
    ValidationField::new("description").of_type(FieldType::String),
    ValidationField::new("dueDate")
        .of_type(FieldType::String)
        .format(Format::Date),
    ValidationField::new("status")
        .of_type(FieldType::String)
        .format(Format::TaskStatus),
    ValidationField::new("labels").of_type(FieldType::Object),
];

pub const DELETE_TASK: &[ValidationField] =
    &[ValidationField::new("id").of_type(FieldType::Number).required()];
