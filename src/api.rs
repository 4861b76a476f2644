//! HTTP client for the maze service. Response bodies are decoded by plain functions
//! so the wire formats can be checked without a browser.

use gloo::net::http::{Request, Response};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ApiError;
use crate::leaderboard::{ScoreEntry, ScoreService, ScoreSubmission};
use crate::model::{Grid, Position};
use crate::util::{cdebug, cinfo, clog};

#[derive(Serialize)]
struct SolveRequest<'a> {
    grid: &'a Grid,
    start: Position,
    goal: Position,
}

#[derive(Deserialize)]
struct SolveResponse {
    #[serde(default)]
    path: Option<Vec<(u32, u32)>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub fn parse_maze_body(body: &str) -> Result<Grid, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Format(format!("invalid maze data: {e}")))
}

/// An absent or null path decodes to an empty one.
pub fn parse_solve_body(body: &str) -> Result<Vec<Position>, ApiError> {
    let resp: SolveResponse = serde_json::from_str(body).map_err(|e| ApiError::Format(e.to_string()))?;
    Ok(resp
        .path
        .unwrap_or_default()
        .into_iter()
        .map(|(x, y)| Position::new(x, y))
        .collect())
}

pub fn parse_scores_body(body: &str) -> Result<Vec<ScoreEntry>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Format(e.to_string()))
}

/// The service's `{"error": "..."}` text, if the body carries one.
pub fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| b.error)
}

fn network(e: gloo::net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

async fn read_body(resp: Response) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text().await.map_err(network)?;
    if !resp.ok() {
        return Err(ApiError::status(status, error_message_from_body(&body)));
    }
    Ok(body)
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpApi {
    config: GameConfig,
}

impl HttpApi {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub async fn fetch_maze(&self, dimension: u32) -> Result<Grid, ApiError> {
        let url = self.config.url(&format!("maze/{dimension}"));
        clog(&format!("fetching maze {dimension}x{dimension}"));
        let resp = Request::get(&url).send().await.map_err(network)?;
        let grid = parse_maze_body(&read_body(resp).await?)?;
        cdebug(&format!("maze received: {}x{} cells", grid.cols(), grid.rows()));
        Ok(grid)
    }

    pub async fn solve(&self, grid: &Grid, start: Position, goal: Position) -> Result<Vec<Position>, ApiError> {
        let body = SolveRequest { grid, start, goal };
        let resp = Request::post(&self.config.url("solve"))
            .json(&body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        parse_solve_body(&read_body(resp).await?)
    }
}

impl ScoreService for HttpApi {
    async fn fetch_scores(&self) -> Result<Vec<ScoreEntry>, ApiError> {
        let resp = Request::get(&self.config.url("leaderboard")).send().await.map_err(network)?;
        parse_scores_body(&read_body(resp).await?)
    }

    async fn post_score(&self, score: &ScoreSubmission) -> Result<(), ApiError> {
        let resp = Request::post(&self.config.url("score"))
            .json(score)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        cinfo(&format!("add score status: {}", resp.status()));
        read_body(resp).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maze_body_must_be_a_rectangular_grid() {
        let grid = parse_maze_body("[[1,1,1],[1,0,1],[1,1,1]]").unwrap();
        assert_eq!(grid.start_position(), Position::new(1, 1));
        assert!(matches!(parse_maze_body("[]"), Err(ApiError::Format(_))));
        assert!(matches!(parse_maze_body("[[0,0],[0]]"), Err(ApiError::Format(_))));
        assert!(matches!(parse_maze_body("{\"grid\":1}"), Err(ApiError::Format(_))));
    }

    #[test]
    fn solve_path_is_column_row_pairs() {
        let path = parse_solve_body(r#"{"path":[[1,1],[2,1],[3,1]]}"#).unwrap();
        assert_eq!(path, vec![Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)]);
    }

    #[test]
    fn missing_or_null_path_means_no_solution() {
        assert!(parse_solve_body("{}").unwrap().is_empty());
        assert!(parse_solve_body(r#"{"path":null}"#).unwrap().is_empty());
        assert!(parse_solve_body(r#"{"path":[]}"#).unwrap().is_empty());
        assert!(parse_solve_body("nope").is_err());
    }

    #[test]
    fn solve_request_shape() {
        let grid = parse_maze_body("[[0,1],[0,0]]").unwrap();
        let req = SolveRequest { grid: &grid, start: Position::new(0, 0), goal: Position::new(1, 1) };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"grid":[[0,1],[0,0]],"start":{"x":0,"y":0},"goal":{"x":1,"y":1}}"#
        );
    }

    #[test]
    fn scores_body_tolerates_missing_fields() {
        let scores = parse_scores_body(r#"[{"name":"Ada","time":12.5,"dimension":5},{"name":"Bo"}]"#).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[1].time, None);
        let scores = parse_scores_body(r#"[{"name":"Ada","time":12.5,"dimension":5},{"name":"Bo","time":"fast","dimension":5}]"#).unwrap();
        assert_eq!(scores[1].time, None);
        assert!(matches!(parse_scores_body(r#"{"scores":[]}"#), Err(ApiError::Format(_))));
    }

    #[test]
    fn error_text_comes_from_body() {
        assert_eq!(error_message_from_body(r#"{"error":"Name too long"}"#), Some("Name too long".into()));
        assert_eq!(error_message_from_body("<html>"), None);
        assert_eq!(error_message_from_body("{}"), None);
    }

    #[test]
    fn score_submission_wire_shape() {
        let score = ScoreSubmission::validate("Ada", 12.5, 5).unwrap();
        assert_eq!(serde_json::to_string(&score).unwrap(), r#"{"name":"Ada","time":12.5,"dimension":5}"#);
    }
}
