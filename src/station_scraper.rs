use anyhow::anyhow;
use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::{
    extract_error::ExtractError,
    price_decoder::decode_price_element,
    station::{PriceQuote, StationRecord},
    text_manipulators::{extract_clean_text, extract_text},
};

/// A fuel grade as a station page lays it out: an opaque label and the
/// selector matching its price cells. The first cell is the cash price
/// when the page splits cash and credit, otherwise the only price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeColumn {
    pub label: String,
    pub cell_selector: String,
}

impl GradeColumn {
    pub fn new(label: impl Into<String>, cell_selector: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cell_selector: cell_selector.into(),
        }
    }

    pub fn regular() -> Self {
        Self::new("87", "td.sp_A")
    }

    pub fn premium() -> Self {
        Self::new("91", "td.sp_C")
    }
}

struct CompiledGrade {
    label: String,
    cells: Selector,
}

#[derive(Default)]
struct GradePrices {
    cash: Option<PriceQuote>,
    credit: Option<PriceQuote>,
}

fn parse_selector(selector: &str) -> anyhow::Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector:?}: {e}"))
}

pub struct StationScraper {
    name_selector: Selector,
    line_selector: Selector,
    cash_credit_selector: Selector,
    price_selector: Selector,
    time_selector: Selector,
    regular: CompiledGrade,
    premium: CompiledGrade,
}

impl StationScraper {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_grades(GradeColumn::regular(), GradeColumn::premium())
    }

    pub fn with_grades(regular: GradeColumn, premium: GradeColumn) -> anyhow::Result<Self> {
        let compile = |grade: GradeColumn| -> anyhow::Result<CompiledGrade> {
            Ok(CompiledGrade {
                cells: parse_selector(&grade.cell_selector)?,
                label: grade.label,
            })
        };
        Ok(Self {
            name_selector: parse_selector("dl.sp_st > dt")?,
            line_selector: parse_selector("dl.sp_st > dd")?,
            cash_credit_selector: parse_selector("li.sp_cash_credit")?,
            price_selector: parse_selector(".sp_p")?,
            time_selector: parse_selector("div.tm")?,
            regular: compile(regular)?,
            premium: compile(premium)?,
        })
    }

    pub fn grade_labels(&self) -> [&str; 2] {
        [self.regular.label.as_str(), self.premium.label.as_str()]
    }

    pub fn scrape_html(&self, url: &str, html: &str) -> Result<StationRecord, ExtractError> {
        let document = Html::parse_document(html);
        self.scrape(url, &document)
    }

    pub fn scrape(&self, url: &str, document: &Html) -> Result<StationRecord, ExtractError> {
        let name = document
            .select(&self.name_selector)
            .next()
            .and_then(extract_clean_text)
            .ok_or(ExtractError::MissingName)?;

        // Street, cross street, city/state/zip, phone.
        let mut lines = document.select(&self.line_selector).map(extract_clean_text);
        let street = lines.next().flatten().ok_or(ExtractError::MissingStreet)?;
        let cross_street = lines.next().flatten();
        let address = match lines.next().flatten() {
            Some(city) => format!("{street}, {city}"),
            None => street,
        };
        let phone = lines.next().flatten();

        let split = document.select(&self.cash_credit_selector).next().is_some();

        let regular = self.scrape_grade(document, &self.regular, split)?;
        let premium = self.scrape_grade(document, &self.premium, split)?;

        Ok(StationRecord {
            url: url.to_string(),
            name,
            address,
            cross_street,
            phone,
            accepts_cash_credit_split: split,
            regular_cash: regular.cash,
            regular_credit: regular.credit,
            premium_cash: premium.cash,
            premium_credit: premium.credit,
        })
    }

    fn scrape_grade(
        &self,
        document: &Html,
        grade: &CompiledGrade,
        split: bool,
    ) -> Result<GradePrices, ExtractError> {
        let mut cells = document.select(&grade.cells);
        let first = match cells.next() {
            Some(cell) => self.scrape_block(grade, 0, cell)?,
            None => {
                debug!("no price cells for grade {}", grade.label);
                return Ok(GradePrices::default());
            }
        };
        if !split {
            return Ok(GradePrices {
                cash: None,
                credit: first,
            });
        }
        let second = match cells.next() {
            Some(cell) => self.scrape_block(grade, 1, cell)?,
            None => None,
        };
        Ok(GradePrices {
            cash: first,
            credit: second,
        })
    }

    fn scrape_block(
        &self,
        grade: &CompiledGrade,
        block: usize,
        cell: ElementRef,
    ) -> Result<Option<PriceQuote>, ExtractError> {
        let Some(price) = cell.select(&self.price_selector).next() else {
            debug!("grade {} block {block} has no price", grade.label);
            return Ok(None);
        };
        let price = decode_price_element(price).map_err(|source| ExtractError::Decode {
            grade: grade.label.clone(),
            block,
            source,
        })?;
        if price.is_empty() {
            debug!("grade {} block {block} has an empty price", grade.label);
            return Ok(None);
        }
        let updated = cell
            .select(&self.time_selector)
            .next()
            .map(|time| extract_text(time).trim().to_string())
            .filter(|time| !time.is_empty());
        Ok(Some(PriceQuote { price, updated }))
    }
}
