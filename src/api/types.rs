use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginReply {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// A student record as the backend returns it. Everything past id, name and
/// email is nullable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Editable fields sent on create and update. An empty date of birth is sent
/// as an explicit `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub email: String,
    pub department: String,
    pub gender: String,
    pub phone: String,
    pub date_of_birth: Option<String>,
}

/// One page of the student list.
///
/// The list field tolerates both `content` and `students`; the backend has
/// been observed answering with either shape. Counters are optional so the
/// caller can fall back on what it asked for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPage {
    #[serde(default, alias = "students")]
    pub content: Vec<Student>,
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub total_elements: Option<u64>,
    pub total_pages: Option<u64>,
}

/// Columns the list endpoint accepts for sorting.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SortField {
    Id,
    Name,
    Email,
    Department,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Department => "department",
        }
    }

    /// Unknown values fall back to sorting by name.
    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some("id") => SortField::Id,
            Some("email") => SortField::Email,
            Some("department") => SortField::Department,
            _ => SortField::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn parse(input: Option<&str>) -> Self {
        match input {
            Some("desc") => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

/// Pagination, filter and sort state driving a list fetch. Owned by the
/// dashboard controller and passed explicitly; never read from ambient state.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u64,
    pub size: u64,
    pub keyword: String,
    pub sort_field: SortField,
    pub sort_dir: SortDir,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            keyword: String::new(),
            sort_field: SortField::Name,
            sort_dir: SortDir::Asc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parses_content_shape() {
        let page: StudentPage = serde_json::from_str(
            r#"{"content":[{"id":1,"name":"Ada","email":"ada@uni.edu"}],
                "pageNumber":0,"pageSize":10,"totalElements":1,"totalPages":1}"#,
        )
        .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Ada");
        assert_eq!(page.total_elements, Some(1));
    }

    #[test]
    fn page_parses_students_shape() {
        let page: StudentPage = serde_json::from_str(
            r#"{"students":[{"id":2,"name":"Linus","email":"linus@uni.edu","department":null}],
                "totalPages":3}"#,
        )
        .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, 2);
        assert!(page.content[0].department.is_none());
        assert_eq!(page.page_number, None);
        assert_eq!(page.total_pages, Some(3));
    }

    #[test]
    fn student_accepts_iso_date_of_birth() {
        let student: Student = serde_json::from_str(
            r#"{"id":7,"name":"Grace","email":"g@uni.edu","dateOfBirth":"1990-05-12T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(student.date_of_birth.as_deref(), Some("1990-05-12T00:00:00Z"));
    }

    #[test]
    fn payload_serializes_null_date_of_birth() {
        let payload = StudentPayload {
            name: "Ada".into(),
            email: "ada@uni.edu".into(),
            department: String::new(),
            gender: String::new(),
            phone: String::new(),
            date_of_birth: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("dateOfBirth").unwrap().is_null());
    }

    #[test]
    fn sort_params_fall_back_to_defaults() {
        assert_eq!(SortField::parse(Some("email")), SortField::Email);
        assert_eq!(SortField::parse(Some("phone")), SortField::Name);
        assert_eq!(SortField::parse(None), SortField::Name);
        assert_eq!(SortDir::parse(Some("desc")), SortDir::Desc);
        assert_eq!(SortDir::parse(Some("sideways")), SortDir::Asc);
    }
}
