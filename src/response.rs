use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Success { success: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct List<T> {
    success: bool,
    data: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(data: Vec<T>, total: i64) -> Self {
        List { success: true, data, total }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    success: bool,
    pub id: i64,
}

impl CreateResponse {
    pub fn new(id: i64) -> Self {
        CreateResponse { success: true, id }
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    success: bool,
    message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse<U> {
    success: bool,
    token: String,
    user: U,
}

impl<U> LoginResponse<U> {
    pub fn new(token: String, user: U) -> Self {
        LoginResponse { success: true, token, user }
    }
}
