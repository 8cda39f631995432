//! # 国キャッシュ
//!
//! 国コード → 国レコードの読み取り専用キャッシュ。
//!
//! ## 設計
//!
//! - マッピングと相関 ID を 1 つの不変スナップショットにまとめ、
//!   `ArcSwapOption` で丸ごと差し替える。リーダーが部分的な
//!   マッピングを観測することはない
//! - 更新は `refresh_lock` で直列化する。未初期化のキャッシュに
//!   同時アクセスしたタスクはロック解放後に再確認し、二重の
//!   `/countries` 呼び出しを合流させる
//! - 更新失敗時は直前のスナップショットを維持し、失敗は更新を
//!   引き起こした呼び出し元に伝播する
//! - エントリ単位の削除は行わない。置き換えは常に全量

use std::{collections::HashMap, sync::Arc, time::Duration};

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;

use crate::{
    client::{LexofficeCountriesClient, LexofficeError},
    client::lexoffice::types::Country,
    error::AdapterError,
};

/// キャッシュの不変スナップショット
///
/// マッピングと、それを作ったレスポンスの相関 ID を一緒に保持する。
/// 相関 ID は国名解決の失敗をどの上流レスポンスに帰属させるかの
/// 診断情報としてだけ使われる。
struct CountrySnapshot {
    countries:  HashMap<String, Country>,
    request_id: Option<String>,
}

/// 国キャッシュ
///
/// プロセスと同じ寿命を持ち、空の状態で作成される。
/// 初回参照時または定期更新タスクで遅延初期化される。
pub struct CountryCache {
    client:       Arc<dyn LexofficeCountriesClient>,
    snapshot:     ArcSwapOption<CountrySnapshot>,
    refresh_lock: Mutex<()>,
}

impl CountryCache {
    /// 空のキャッシュを作成する
    pub fn new(client: Arc<dyn LexofficeCountriesClient>) -> Self {
        Self {
            client,
            snapshot: ArcSwapOption::const_empty(),
            refresh_lock: Mutex::new(()),
        }
    }

    /// 国コードから英語の国名を解決する
    ///
    /// キャッシュが未初期化なら遅延更新を行う。更新後もコードが
    /// 見つからない場合は、キャッシュを作ったレスポンスの相関 ID を
    /// 添えて [`AdapterError::CountryMappingMissing`] を返す。
    pub async fn lookup_name(&self, country_code: &str) -> Result<String, AdapterError> {
        let snapshot = self.ensure_filled().await?;

        match snapshot.countries.get(country_code) {
            Some(country) => Ok(country.country_name_en.clone()),
            None => Err(AdapterError::CountryMappingMissing {
                country_code: country_code.to_string(),
                upstream_request_id: snapshot.request_id.clone(),
            }),
        }
    }

    /// 国コードがキャッシュに存在するかを返す
    ///
    /// キャッシュが未初期化なら遅延更新を行う。空文字列は常に `false`。
    pub async fn is_valid_code(&self, country_code: &str) -> Result<bool, LexofficeError> {
        let snapshot = self.ensure_filled().await?;

        if country_code.is_empty() {
            return Ok(false);
        }

        Ok(snapshot.countries.contains_key(country_code))
    }

    /// キャッシュを更新する
    ///
    /// `/countries` を呼び出して新しいマッピングを構築し、相関 ID と
    /// 一緒にアトミックに差し替える。失敗時は既存のスナップショットを
    /// 維持したままエラーを返す。
    pub async fn refresh(&self) -> Result<(), LexofficeError> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_install().await.map(|_| ())
    }

    /// キャッシュを無効化する
    ///
    /// マッピングと相関 ID を破棄する。以降の参照は遅延更新を
    /// 引き起こす。何度呼んでも同じ結果になる。
    pub fn invalidate(&self) {
        tracing::info!("国キャッシュを無効化します");
        self.snapshot.store(None);
    }

    /// 定期更新タスクを起動する
    ///
    /// 専用のタイマータスクで `period` ごとに [`refresh`](Self::refresh) を
    /// 呼び出す。最初の tick は即時に発火するため、プロセス起動直後に
    /// キャッシュが温まる。失敗してもタスクは止めず、次の周期に任せる。
    pub fn spawn_refresh_task(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(e) = cache.refresh().await {
                    tracing::warn!("国キャッシュの定期更新に失敗（既存のキャッシュを維持）: {}", e);
                }
            }
        })
    }

    /// スナップショットを返し、未初期化なら埋めてから返す
    ///
    /// ロック獲得後に再確認することで、同時に未初期化を観測した
    /// タスク群の更新を 1 回の `/countries` 呼び出しに合流させる。
    async fn ensure_filled(&self) -> Result<Arc<CountrySnapshot>, LexofficeError> {
        if let Some(snapshot) = self.snapshot.load_full() {
            return Ok(snapshot);
        }

        let _guard = self.refresh_lock.lock().await;

        // ロック待ちの間に他のタスクが埋めた可能性がある
        if let Some(snapshot) = self.snapshot.load_full() {
            return Ok(snapshot);
        }

        self.fetch_and_install().await
    }

    /// 新しいスナップショットを構築してアトミックに公開する
    ///
    /// 呼び出し側が `refresh_lock` を保持していること。
    async fn fetch_and_install(&self) -> Result<Arc<CountrySnapshot>, LexofficeError> {
        tracing::info!("国キャッシュを更新します");

        let response = self.client.get_countries().await?;

        let countries: HashMap<String, Country> = response
            .countries
            .into_iter()
            .map(|country| (country.country_code.clone(), country))
            .collect();

        let snapshot = Arc::new(CountrySnapshot {
            countries,
            request_id: response.request_id,
        });
        self.snapshot.store(Some(Arc::clone(&snapshot)));

        tracing::info!("国キャッシュを {} 件で更新しました", snapshot.countries.len());
        Ok(snapshot)
    }
}
