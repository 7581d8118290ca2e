use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,

    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// GitHub answers 200 with an `errors` array for failed queries; treat any error as failure.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.errors.is_empty() {
            return Err(ApiError::GraphQl(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data.ok_or(ApiError::MissingData("data"))
    }
}
