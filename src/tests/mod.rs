mod cross_algorithm;
