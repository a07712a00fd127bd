use research_core::schema;
use research_core::{BondRecord, MarketSnapshot, QuarterlyFinancials};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::cells::{self, ColumnIndex};
use crate::error::DataError;

/// Locations of the three source reports.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub bonds: PathBuf,
    pub quarterly: PathBuf,
    pub market: PathBuf,
}

impl DataPaths {
    /// Standard file names inside a data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            bonds: dir.join("issue_decision_regular_report.csv"),
            quarterly: dir.join("business_quarterly_report.csv"),
            market: dir.join("market_info.csv"),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir("data")
    }
}

/// Quarterly report rows plus the header order they were read in.
#[derive(Debug, Clone, Default)]
pub struct QuarterlyTable {
    pub headers: Vec<String>,
    pub rows: Vec<QuarterlyFinancials>,
}

impl QuarterlyTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Market snapshot rows plus the header order they were read in.
#[derive(Debug, Clone, Default)]
pub struct MarketTable {
    pub headers: Vec<String>,
    pub rows: Vec<MarketSnapshot>,
}

impl MarketTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// The three report datasets, loaded once at startup and read-only after.
///
/// Bond security names are normalized to their company key at load time, so
/// queries never mutate the store.
#[derive(Debug, Clone, Default)]
pub struct TabularStore {
    pub(crate) bonds: Vec<BondRecord>,
    pub(crate) quarterly: QuarterlyTable,
    pub(crate) market: MarketTable,
}

impl TabularStore {
    /// Load every report from disk. A report that cannot be read is logged and
    /// replaced by an empty dataset; this never fails.
    pub fn load(paths: &DataPaths) -> Self {
        let bonds = load_or_empty(&paths.bonds, read_bonds::<File>);
        let quarterly = load_or_empty(&paths.quarterly, read_quarterly::<File>);
        let market = load_or_empty(&paths.market, read_market::<File>);

        tracing::info!(
            "Loaded tabular store: bonds={}, quarterly={}, market={}",
            bonds.len(),
            quarterly.rows.len(),
            market.rows.len()
        );

        Self {
            bonds,
            quarterly,
            market,
        }
    }

    /// Build a store from in-memory CSV sources.
    pub fn from_readers<B: Read, Q: Read, M: Read>(
        bonds: B,
        quarterly: Q,
        market: M,
    ) -> Result<Self, DataError> {
        Ok(Self {
            bonds: read_bonds(bonds)?,
            quarterly: read_quarterly(quarterly)?,
            market: read_market(market)?,
        })
    }

    pub fn from_parts(bonds: Vec<BondRecord>, quarterly: QuarterlyTable, market: MarketTable) -> Self {
        Self {
            bonds,
            quarterly,
            market,
        }
    }

    pub fn bonds(&self) -> &[BondRecord] {
        &self.bonds
    }

    pub fn quarterly(&self) -> &QuarterlyTable {
        &self.quarterly
    }

    pub fn market(&self) -> &MarketTable {
        &self.market
    }
}

fn load_or_empty<T: Default>(path: &Path, read: fn(File) -> Result<T, DataError>) -> T {
    let result = File::open(path)
        .map_err(|source| DataError::Open {
            path: path.display().to_string(),
            source,
        })
        .and_then(read);

    match result {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Error loading {}: {}", path.display(), e);
            T::default()
        }
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

fn read_bonds<R: Read>(reader: R) -> Result<Vec<BondRecord>, DataError> {
    let mut rdr = csv_reader(reader);
    let index = ColumnIndex::new(rdr.headers()?);

    let security = index.require(schema::SECURITY_NAME)?;
    let amount = index.require(schema::TOTAL_AMOUNT)?;
    let rate = index.require(schema::COUPON_RATE)?;
    let issuer = index.position(schema::ISSUER_NAME);
    let issued = index.position(schema::ISSUE_DATE);
    let matures = index.position(schema::MATURITY_DATE);

    let mut bonds = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut bond = BondRecord::new(
            cells::text(&record, issuer),
            cells::text(&record, Some(security)),
        );
        bond.total_amount = cells::number(&record, Some(amount));
        bond.coupon_rate = cells::number(&record, Some(rate));
        bond.issue_date = cells::date(&record, issued);
        bond.maturity_date = cells::date(&record, matures);
        bonds.push(bond);
    }

    Ok(bonds)
}

fn read_quarterly<R: Read>(reader: R) -> Result<QuarterlyTable, DataError> {
    let mut rdr = csv_reader(reader);
    let header_record = rdr.headers()?.clone();
    let index = ColumnIndex::new(&header_record);
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();

    let company = index.require(schema::SECURITY_NAME)?;
    let debt = index.position(schema::DEBT_RATIO);
    let holder = index.position(schema::SHAREHOLDER_RATIO);
    let maturity = index.position(schema::PRIOR_BOND_MATURITY);

    let quarter_columns: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| schema::is_quarter_revenue_column(h) || schema::is_quarter_profit_column(h))
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = QuarterlyFinancials::new(cells::text(&record, Some(company)));
        row.debt_ratio = cells::number(&record, debt);
        row.major_shareholder_ratio = cells::number(&record, holder);
        row.prior_bond_maturity = cells::date(&record, maturity);
        for (pos, header) in &quarter_columns {
            row.quarter_figures
                .insert((*header).clone(), cells::number(&record, Some(*pos)));
        }
        rows.push(row);
    }

    Ok(QuarterlyTable { headers, rows })
}

fn read_market<R: Read>(reader: R) -> Result<MarketTable, DataError> {
    let mut rdr = csv_reader(reader);
    let header_record = rdr.headers()?.clone();
    let index = ColumnIndex::new(&header_record);
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();

    let company = index.require(schema::SECURITY_NAME)?;
    let price = index.position(schema::SHARE_PRICE);
    let cap = index.position(schema::MARKET_CAP);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(MarketSnapshot::new(
            cells::text(&record, Some(company)),
            cells::number(&record, price),
            cells::number(&record, cap),
        ));
    }

    Ok(MarketTable { headers, rows })
}
