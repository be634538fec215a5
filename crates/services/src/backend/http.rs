use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use outloud_core::model::{
    Block, BlockId, Price, PurchaseRequest, Question, QuestionId, ThemeConfig, UserId,
};

use super::Backend;
use crate::config::{ApiFlavor, ClientConfig, PurchaseMode};
use crate::error::BackendError;

/// `Backend` over the real HTTP api.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    api_url: Url,
    flavor: ApiFlavor,
}

impl HttpBackend {
    /// `api_url` must end with `/` so relative routes keep its path prefix;
    /// `config::parse_api_url` guarantees that.
    #[must_use]
    pub fn new(api_url: Url, flavor: ApiFlavor) -> Self {
        Self {
            client: Client::new(),
            api_url,
            flavor,
        }
    }

    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone(), config.flavor)
    }

    #[must_use]
    pub fn flavor(&self) -> ApiFlavor {
        self.flavor
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.api_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = ensure_success(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Response, BackendError> {
        let response = self.client.post(url).json(body).send().await?;
        ensure_success(response)
    }
}

fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::HttpStatus(status))
    }
}

#[derive(Debug, Deserialize)]
struct PurchaseStatus {
    purchased: bool,
}

#[derive(Debug, Deserialize)]
struct BundlePrice {
    #[serde(default)]
    price: Price,
}

#[derive(Debug, Serialize)]
struct PurchaseBody {
    user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_id: Option<BlockId>,
}

#[derive(Debug, Serialize)]
struct InvoiceBody {
    user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_id: Option<BlockId>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    all_blocks: bool,
}

#[derive(Debug, Deserialize)]
struct InvoiceReply {
    #[serde(default)]
    ok: bool,
}

#[derive(Debug, Serialize)]
struct ViewBody {
    user_id: UserId,
    question_id: QuestionId,
}

#[async_trait]
impl Backend for HttpBackend {
    async fn theme(&self) -> Result<ThemeConfig, BackendError> {
        self.get_json(self.endpoint("api/design")?).await
    }

    async fn blocks(&self, user_id: Option<UserId>) -> Result<Vec<Block>, BackendError> {
        let mut url = self.endpoint("api/blocks")?;
        if let (true, Some(user_id)) = (self.flavor.blocks_with_user(), user_id) {
            url.query_pairs_mut()
                .append_pair("user_id", &user_id.to_string());
        }
        self.get_json(url).await
    }

    async fn bundle_price(&self) -> Result<Price, BackendError> {
        let reply: BundlePrice = self.get_json(self.endpoint("api/all_blocks_price")?).await?;
        Ok(reply.price)
    }

    async fn questions(&self, block_id: BlockId) -> Result<Vec<Question>, BackendError> {
        let mut url = self.endpoint(&self.flavor.questions_path(block_id))?;
        if self.flavor.questions_by_query() {
            url.query_pairs_mut()
                .append_pair("block_id", &block_id.to_string());
        }
        self.get_json(url).await
    }

    async fn check_purchase(
        &self,
        user_id: UserId,
        block_id: BlockId,
    ) -> Result<bool, BackendError> {
        let url = self.endpoint(&format!("api/check_purchase/{user_id}/{block_id}"))?;
        let status: PurchaseStatus = self.get_json(url).await?;
        Ok(status.purchased)
    }

    async fn purchase(&self, request: &PurchaseRequest) -> Result<bool, BackendError> {
        match self.flavor.purchase_mode() {
            PurchaseMode::Direct => {
                let body = PurchaseBody {
                    user_id: request.user_id,
                    block_id: request.block_id(),
                };
                self.post_json(self.endpoint("api/purchase")?, &body)
                    .await?;
                Ok(true)
            }
            PurchaseMode::Invoice => {
                let body = InvoiceBody {
                    user_id: request.user_id,
                    block_id: request.block_id(),
                    all_blocks: request.block_id().is_none(),
                };
                let reply: InvoiceReply = self
                    .post_json(self.endpoint("api/create_invoice")?, &body)
                    .await?
                    .json()
                    .await?;
                Ok(reply.ok)
            }
        }
    }

    async fn log_view(
        &self,
        user_id: UserId,
        question_id: QuestionId,
    ) -> Result<(), BackendError> {
        let body = ViewBody {
            user_id,
            question_id,
        };
        self.post_json(self.endpoint(self.flavor.view_path())?, &body)
            .await?;
        Ok(())
    }
}
