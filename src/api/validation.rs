use super::ApiError;
use crate::domain::MovieId;
use crate::models::movie::ImageType;

pub fn validate_movie_id(id: i32) -> Result<MovieId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid movie ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(MovieId::new(id))
}

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    const MAX_LENGTH: usize = 200;

    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }
    if trimmed.chars().count() > MAX_LENGTH {
        return Err(ApiError::validation(format!(
            "Title too long. Maximum {MAX_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

pub fn validate_image_type(raw: &str) -> Result<ImageType, ApiError> {
    raw.parse::<ImageType>().map_err(ApiError::validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_ids_must_be_positive() {
        assert!(validate_movie_id(0).is_err());
        assert!(validate_movie_id(-1).is_err());
        assert_eq!(validate_movie_id(5).unwrap(), MovieId::new(5));
    }

    #[test]
    fn titles_are_trimmed_and_bounded() {
        assert_eq!(validate_title("  Heat ").unwrap(), "Heat");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn image_type_path_segments() {
        assert_eq!(validate_image_type("poster").unwrap(), ImageType::Poster);
        assert!(validate_image_type("thumb").is_err());
    }
}
