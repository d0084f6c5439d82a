use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Address recorded on articles created through the API.
const CREATED_IP_ADDRESS: &str = "111.111.111.111";

/// Demo board article. Nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub contents: Option<String>,
    pub view_cnt: i64,
    pub ip_addres: Option<String>,
    pub created_at: String,
    pub created_member_id: i64,
}

impl Article {
    /// Build the article returned for a create request.
    pub fn create(title: String, contents: Option<String>, member_id: i64) -> Self {
        Self {
            id: 1,
            title,
            contents,
            view_cnt: 0,
            ip_addres: Some(CREATED_IP_ADDRESS.to_string()),
            created_at: now_millis(),
            created_member_id: member_id,
        }
    }
}

/// The fixed article list served on `GET /api/article`.
pub fn sample_articles() -> Vec<Article> {
    let created_at = now_millis();
    vec![
        Article {
            id: 1,
            title: "게시글 제목1입니다.".to_string(),
            contents: Some("내용1입니다.".to_string()),
            view_cnt: 0,
            ip_addres: Some(String::new()),
            created_at: created_at.clone(),
            created_member_id: 1,
        },
        Article {
            id: 2,
            title: "게시글 제목2입니다.".to_string(),
            contents: Some("내용2입니다.".to_string()),
            view_cnt: 0,
            ip_addres: Some(String::new()),
            created_at,
            created_member_id: 2,
        },
    ]
}

/// Unix epoch milliseconds as a decimal string.
fn now_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_echoes_input_with_zero_views() {
        let article = Article::create("title".into(), Some("body".into()), 7);

        assert_eq!(article.title, "title");
        assert_eq!(article.contents.as_deref(), Some("body"));
        assert_eq!(article.created_member_id, 7);
        assert_eq!(article.view_cnt, 0);
        assert_eq!(article.ip_addres.as_deref(), Some(CREATED_IP_ADDRESS));

        let value = serde_json::to_value(Article {
            ip_addres: None,
            ..article
        })
        .unwrap();
        assert!(value["ip_addres"].is_null());
        assert!(value.as_object().unwrap().contains_key("ip_addres"));
    }

    #[test]
    fn created_at_is_epoch_millis() {
        let article = Article::create("t".into(), None, 1);
        let millis: u128 = article.created_at.parse().unwrap();
        assert!(millis > 1_600_000_000_000);
    }

    #[test]
    fn sample_articles_are_two_unviewed_posts() {
        let articles = sample_articles();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, 1);
        assert_eq!(articles[1].created_member_id, 2);
        assert!(articles.iter().all(|a| a.view_cnt == 0));
    }

    #[test]
    fn null_contents_serializes_as_null() {
        let article = Article::create("t".into(), None, 1);
        let value = serde_json::to_value(&article).unwrap();
        assert!(value["contents"].is_null());
    }
}
