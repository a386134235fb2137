use std::sync::Arc;

use crate::domain::error::AnalyzeError;
use crate::domain::inference::TableAnswer;
use crate::infrastructure::csv::TableParser;
use crate::infrastructure::llm_clients::gateway::InferenceGateway;

/// Upload path: normalize the uploaded file into a table, then ask the
/// table-QA provider the caller's question.
pub struct AnalyzeUseCase {
    parser: TableParser,
    gateway: Arc<InferenceGateway>,
}

impl AnalyzeUseCase {
    pub fn new(gateway: Arc<InferenceGateway>) -> Self {
        Self {
            parser: TableParser::new(),
            gateway,
        }
    }

    pub async fn execute(
        &self,
        file_content: &str,
        question: &str,
    ) -> Result<TableAnswer, AnalyzeError> {
        let table = self.parser.parse(file_content)?;
        let answer = self.gateway.analyze_table(&table, question).await?;
        Ok(answer)
    }
}
