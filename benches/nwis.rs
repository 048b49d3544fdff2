use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nwis::{
    waterml_to_df, CodeValue, Observation, SourceInfo, TimeSeries, TimeSeriesList, ValueBlock,
    Variable, WaterMlResponse,
};

fn year_of_daily_values(site: &str, code: &str) -> TimeSeries {
    let observations: Vec<Observation> = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .iter_days()
        .take(365)
        .enumerate()
        .map(|(i, day)| Observation {
            date_time: day.format("%Y-%m-%dT00:00:00.000").to_string(),
            value: format!("{}.0", i),
        })
        .collect();

    TimeSeries {
        source_info: SourceInfo {
            site_code: vec![CodeValue {
                value: site.to_string(),
            }],
        },
        variable: Variable {
            variable_code: vec![CodeValue {
                value: code.to_string(),
            }],
            no_data_value: Some(-999999.0),
        },
        values: vec![ValueBlock {
            value: observations,
        }],
    }
}

fn bench_normalize(c: &mut Criterion) {
    let payload = WaterMlResponse {
        value: Some(TimeSeriesList {
            time_series: vec![
                year_of_daily_values("01491000", "00060"),
                year_of_daily_values("01491000", "80155"),
                year_of_daily_values("01646500", "00060"),
            ],
        }),
    };
    let codes = vec!["00060".to_string(), "80155".to_string()];

    c.bench_function("waterml_to_df_year", |b| {
        b.iter(|| waterml_to_df(black_box(Some(&payload)), black_box(&codes)))
    });
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
